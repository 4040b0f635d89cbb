//! Rebalancing models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of the adjustment that would bring a category to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RebalanceAction {
    /// Category is undersized - money should move into it.
    Buy,
    /// Category is oversized - money should move out of it.
    Sell,
    /// Within one currency unit of target - not worth a trade.
    Hold,
}

/// One targeted category's gap between actual and target allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceSuggestion {
    pub category_id: String,
    pub category_name: String,
    pub current_value: Decimal,
    pub current_percentage: Decimal,
    pub target_percentage: Decimal,
    /// Signed gap in currency units; positive means oversized.
    pub difference: Decimal,
    pub action: RebalanceAction,
}

/// Informational allocation row for categories outside the suggestion set
/// (no target configured, or the uncategorized bucket).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRow {
    pub name: String,
    pub current_value: Decimal,
    pub current_percentage: Decimal,
}

/// A single suggested movement of money between two categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub from_category: String,
    pub to_category: String,
    pub amount: Decimal,
}

/// Full output of the suggestion engine for one valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalancePlan {
    /// Targeted categories sorted by absolute imbalance, largest first.
    pub suggestions: Vec<RebalanceSuggestion>,
    /// Categories without a target - never part of the suggestions.
    pub no_target_rows: Vec<AllocationRow>,
    /// Assets with no category at all, aggregated.
    pub uncategorized_row: Option<AllocationRow>,
    /// Plain-language transfer suggestions, greedily minimized.
    pub summary_texts: Vec<String>,
    /// Set when the configured targets do not sum to 100 percent.
    /// Informational only, never an error.
    pub target_sum_warning: Option<String>,
}
