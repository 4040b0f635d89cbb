//! Carry-forward resolution of user-entered snapshots.
//!
//! Users record values sparsely: a snapshot only touches the platforms they
//! updated that day. An asset's last recorded value therefore stays current
//! until a later snapshot overwrites it, and an asset whose records all lie
//! after the requested date does not exist yet as of that date.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::assets::Asset;
use crate::categories::Category;
use crate::constants::{DISPLAY_DECIMAL_PRECISION, UNCATEGORIZED_LABEL};
use crate::fx::{convert_amount, ExchangeRateTable};
use crate::portfolio::performance::category_allocation;
use crate::portfolio::snapshot::SnapshotHistory;
use crate::portfolio::valuation::{CategoryValuation, EffectivePosition, EffectiveValuation};

/// Resolves effective valuations from the snapshot history.
///
/// Construction indexes every asset's value records as a date-ordered map,
/// so each `resolve` is one range lookup per asset instead of a rescan of
/// the whole history.
pub struct ValuationResolver<'a> {
    assets: &'a [Asset],
    categories_by_id: HashMap<&'a str, &'a Category>,
    history: &'a SnapshotHistory,
    /// asset id -> (snapshot date -> recorded value), ascending by date.
    records: HashMap<String, BTreeMap<NaiveDate, Decimal>>,
}

impl<'a> ValuationResolver<'a> {
    pub fn new(
        assets: &'a [Asset],
        categories: &'a [Category],
        history: &'a SnapshotHistory,
    ) -> Self {
        let categories_by_id: HashMap<&str, &Category> = categories
            .iter()
            .map(|category| (category.id.as_str(), category))
            .collect();

        let mut records: HashMap<String, BTreeMap<NaiveDate, Decimal>> = HashMap::new();
        for snapshot in history.snapshots() {
            for record in &snapshot.value_records {
                // Within one snapshot the last entry for an asset wins.
                records
                    .entry(record.asset_id.clone())
                    .or_default()
                    .insert(snapshot.snapshot_date, record.value);
            }
        }

        Self {
            assets,
            categories_by_id,
            history,
            records,
        }
    }

    /// Reconstructs the effective holdings as of `as_of`.
    ///
    /// Every asset contributes its latest record dated at or before `as_of`;
    /// assets with no record by then are excluded entirely (not shown as
    /// zero). Resolving the same date against the same history always yields
    /// the same valuation.
    pub fn resolve(
        &self,
        as_of: NaiveDate,
        display_currency: &str,
        rates: &ExchangeRateTable,
    ) -> EffectiveValuation {
        if self.history.latest_at_or_before(as_of).is_none() {
            debug!("No snapshot at or before {}; returning empty valuation", as_of);
            return EffectiveValuation::empty(as_of, display_currency, rates.is_fallback);
        }

        let mut positions: Vec<EffectivePosition> = Vec::new();
        for asset in self.assets {
            let Some(asset_records) = self.records.get(&asset.id) else {
                continue;
            };
            let Some((record_date, local_value)) = asset_records.range(..=as_of).next_back()
            else {
                continue;
            };

            let value = convert_amount(*local_value, &asset.currency, display_currency, rates);
            let (category_id, category) = self.resolve_category(asset);

            positions.push(EffectivePosition {
                asset_id: asset.id.clone(),
                name: asset.name.clone(),
                platform: asset.platform.clone(),
                category_id,
                category,
                currency: asset.currency.clone(),
                local_value: *local_value,
                value,
                as_of: *record_date,
            });
        }

        positions.sort_by(|a, b| {
            a.platform
                .cmp(&b.platform)
                .then_with(|| a.name.cmp(&b.name))
        });

        let total_value: Decimal = positions.iter().map(|position| position.value).sum();
        let categories = self.group_by_category(&positions, total_value);

        EffectiveValuation {
            as_of,
            display_currency: display_currency.to_string(),
            total_value,
            positions,
            categories,
            rates_are_fallback: rates.is_fallback,
        }
    }

    /// Resolves the valuation for the latest snapshot, if any history exists.
    pub fn resolve_latest(
        &self,
        display_currency: &str,
        rates: &ExchangeRateTable,
    ) -> Option<EffectiveValuation> {
        self.history
            .latest()
            .map(|snapshot| self.resolve(snapshot.snapshot_date, display_currency, rates))
    }

    fn resolve_category(&self, asset: &Asset) -> (Option<String>, String) {
        match asset.category_id.as_deref() {
            Some(id) => {
                let label = self
                    .categories_by_id
                    .get(id)
                    .map(|category| category.name.clone())
                    // Dangling reference: keep the raw id visible rather than
                    // silently merging into the uncategorized bucket.
                    .unwrap_or_else(|| id.to_string());
                (Some(id.to_string()), label)
            }
            None => (None, UNCATEGORIZED_LABEL.to_string()),
        }
    }

    fn group_by_category(
        &self,
        positions: &[EffectivePosition],
        total_value: Decimal,
    ) -> Vec<CategoryValuation> {
        // key -> (label, sort order, value); known categories keep their
        // display order, dangling references sort after them, uncategorized
        // always last.
        let mut groups: HashMap<Option<String>, (String, (i32, String), Decimal)> = HashMap::new();
        for position in positions {
            let order = match position.category_id.as_deref() {
                Some(id) => self
                    .categories_by_id
                    .get(id)
                    .map(|category| (category.display_order, category.name.clone()))
                    .unwrap_or((i32::MAX - 1, position.category.clone())),
                None => (i32::MAX, UNCATEGORIZED_LABEL.to_string()),
            };
            let entry = groups
                .entry(position.category_id.clone())
                .or_insert_with(|| (position.category.clone(), order, Decimal::ZERO));
            entry.2 += position.value;
        }

        let mut categories: Vec<(Option<String>, String, (i32, String), Decimal)> = groups
            .into_iter()
            .map(|(id, (label, order, value))| (id, label, order, value))
            .collect();
        categories.sort_by(|a, b| a.2.cmp(&b.2));

        categories
            .into_iter()
            .map(|(category_id, name, _, value)| CategoryValuation {
                category_id,
                name,
                percentage: category_allocation(value, total_value)
                    .round_dp(DISPLAY_DECIMAL_PRECISION),
                value,
            })
            .collect()
    }
}
