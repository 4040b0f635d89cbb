//! Snapshot domain models.
//!
//! A snapshot is a dated record of the portfolio state as the user entered
//! it. An asset missing from a snapshot's value records is *unchanged*, not
//! zero; its last recorded value stays current until a later snapshot
//! overwrites it (carry-forward).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Error, Result, ValidationError};

/// A market value the user entered for one asset in one snapshot,
/// denominated in the asset's currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRecord {
    pub asset_id: String,
    pub value: Decimal,
}

/// An external deposit (positive) or withdrawal (negative) recorded in a
/// snapshot. Flows carry their own currency, independent of any asset, and
/// must be excluded from organic performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowOperation {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
}

impl CashFlowOperation {
    pub fn new(description: &str, amount: Decimal, currency: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: description.to_string(),
            amount,
            currency: currency.to_string(),
        }
    }
}

/// A dated record of the portfolio's state: per-asset value records plus the
/// external cash flows booked on that date. At most one snapshot per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    pub snapshot_date: NaiveDate,
    #[serde(default)]
    pub value_records: Vec<ValueRecord>,
    #[serde(default)]
    pub cash_flows: Vec<CashFlowOperation>,
}

impl Snapshot {
    pub fn new(snapshot_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            snapshot_date,
            value_records: Vec::new(),
            cash_flows: Vec::new(),
        }
    }

    pub fn with_value(mut self, asset_id: &str, value: Decimal) -> Self {
        self.value_records.push(ValueRecord {
            asset_id: asset_id.to_string(),
            value,
        });
        self
    }

    pub fn with_cash_flow(mut self, flow: CashFlowOperation) -> Self {
        self.cash_flows.push(flow);
        self
    }
}

/// The full snapshot history, sorted ascending by date and validated to hold
/// at most one snapshot per date. Building it once up front keeps every
/// "latest at or before" lookup a binary search instead of a rescan.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHistory {
    snapshots: Vec<Snapshot>,
}

impl SnapshotHistory {
    pub fn new(mut snapshots: Vec<Snapshot>) -> Result<Self> {
        snapshots.sort_by_key(|snapshot| snapshot.snapshot_date);
        for window in snapshots.windows(2) {
            if window[0].snapshot_date == window[1].snapshot_date {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Duplicate snapshot date {}",
                    window[0].snapshot_date
                ))));
            }
        }
        Ok(Self { snapshots })
    }

    /// Snapshots in ascending date order.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// The most recent snapshot dated at or before `date`, if any.
    pub fn latest_at_or_before(&self, date: NaiveDate) -> Option<&Snapshot> {
        let idx = self
            .snapshots
            .partition_point(|snapshot| snapshot.snapshot_date <= date);
        if idx == 0 {
            None
        } else {
            Some(&self.snapshots[idx - 1])
        }
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.snapshots.iter().map(|snapshot| snapshot.snapshot_date)
    }
}
