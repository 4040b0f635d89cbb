//! Exchange rate table handed to the engine by the rate-fetching collaborator.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::fx::currency::normalize_currency_code;

/// A point-in-time table of base-relative exchange rates.
///
/// Rates are multipliers against one unit of the base currency:
/// `amount_in_base * rate = amount_in_target`. The engine treats each table
/// as an immutable value; refreshing is the collaborator's job, and a table
/// served from cache instead of a fresh fetch carries `is_fallback = true`
/// so valuations built from it can be flagged as stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateTable {
    pub base_currency: String,
    /// Rate per unit of base, keyed by normalized currency code.
    pub rates: HashMap<String, Decimal>,
    pub fetch_date: DateTime<Utc>,
    pub is_fallback: bool,
}

impl ExchangeRateTable {
    pub fn new(base_currency: &str, fetch_date: DateTime<Utc>, is_fallback: bool) -> Self {
        Self {
            base_currency: normalize_currency_code(base_currency),
            rates: HashMap::new(),
            fetch_date,
            is_fallback,
        }
    }

    /// A freshly-stamped table with no rates. Conversions against it all
    /// degrade to pass-through.
    pub fn empty(base_currency: &str) -> Self {
        Self::new(base_currency, Utc::now(), false)
    }

    pub fn with_rate(mut self, code: &str, rate: Decimal) -> Self {
        self.rates.insert(normalize_currency_code(code), rate);
        self
    }

    /// Returns the usable rate for `code`: `1` for the base currency itself,
    /// `None` when the rate is missing or zero. A zero rate can never be
    /// divided through and would zero out any amount it multiplies, so it is
    /// unusable on either side of a conversion.
    pub fn rate_for(&self, code: &str) -> Option<Decimal> {
        let code = normalize_currency_code(code);
        if code == self.base_currency {
            return Some(Decimal::ONE);
        }
        self.rates.get(&code).copied().filter(|rate| !rate.is_zero())
    }
}
