//! Effective valuation models - the resolver's output.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One asset's effective value as of a requested date, possibly carried
/// forward from an earlier snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePosition {
    pub asset_id: String,
    pub name: String,
    pub platform: String,
    pub category_id: Option<String>,
    /// Resolved category label; "Uncategorized" when the asset has none.
    pub category: String,
    /// The asset's own currency.
    pub currency: String,
    /// Recorded market value in the asset's currency.
    pub local_value: Decimal,
    /// Value converted into the valuation's display currency.
    pub value: Decimal,
    /// Date of the snapshot the value was taken from (<= the requested date).
    pub as_of: NaiveDate,
}

/// Aggregated value of one category within an effective valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryValuation {
    pub category_id: Option<String>,
    pub name: String,
    pub value: Decimal,
    /// Share of the grand total, in percent. Zero when the total is zero.
    pub percentage: Decimal,
}

/// The reconstructed state of the whole portfolio as of one snapshot date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveValuation {
    pub as_of: NaiveDate,
    pub display_currency: String,
    pub total_value: Decimal,
    pub positions: Vec<EffectivePosition>,
    pub categories: Vec<CategoryValuation>,
    /// Mirrors the rate table's fallback flag so UIs can warn about
    /// valuations built from cached rates.
    pub rates_are_fallback: bool,
}

impl EffectiveValuation {
    /// A valuation with no holdings - the result of resolving a date that
    /// precedes all recorded history.
    pub fn empty(as_of: NaiveDate, display_currency: &str, rates_are_fallback: bool) -> Self {
        Self {
            as_of,
            display_currency: display_currency.to_string(),
            total_value: Decimal::ZERO,
            positions: Vec::new(),
            categories: Vec::new(),
            rates_are_fallback,
        }
    }

    /// The aggregated value of the category with the given id, if present.
    pub fn category_value(&self, category_id: &str) -> Option<Decimal> {
        self.categories
            .iter()
            .find(|c| c.category_id.as_deref() == Some(category_id))
            .map(|c| c.value)
    }
}
