//! Performance metric models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point in a cumulative return series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnData {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// An external cash flow positioned inside a measurement period.
///
/// `days_since_start` runs from 0 (period start, full Dietz weight) to the
/// period length (period end, zero weight); both boundaries are valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCashFlow {
    pub amount: Decimal,
    pub days_since_start: i64,
}

/// One resolved valuation feeding the performance history: the portfolio
/// total on a snapshot date plus the net external flow recorded in that
/// snapshot, both in the reporting currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationPoint {
    pub date: NaiveDate,
    pub total_value: Decimal,
    pub net_external_flow: Decimal,
}

/// Performance metrics over a window of snapshot history.
///
/// Metrics that are undefined for the window's inputs (non-positive basis,
/// non-positive elapsed time, non-positive Dietz denominator) are `None`;
/// the defined ones are still populated independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub currency: String,
    pub period_start_date: Option<NaiveDate>,
    pub period_end_date: Option<NaiveDate>,
    /// Cumulative time-weighted return history, one point per snapshot,
    /// starting at zero.
    pub returns: Vec<ReturnData>,
    pub cumulative_twr: Decimal,
    pub annualized_twr: Decimal,
    pub growth_rate: Option<Decimal>,
    pub modified_dietz: Option<Decimal>,
    pub cagr: Option<Decimal>,
    pub gain_loss_amount: Option<Decimal>,
    pub volatility: Decimal,
    pub max_drawdown: Decimal,
}

impl PerformanceMetrics {
    /// Metrics for a window with fewer than two valuation points - nothing
    /// is computable yet.
    pub fn empty(currency: &str) -> Self {
        Self {
            currency: currency.to_string(),
            period_start_date: None,
            period_end_date: None,
            returns: Vec::new(),
            cumulative_twr: Decimal::ZERO,
            annualized_twr: Decimal::ZERO,
            growth_rate: None,
            modified_dietz: None,
            cagr: None,
            gain_loss_amount: None,
            volatility: Decimal::ZERO,
            max_drawdown: Decimal::ZERO,
        }
    }
}
