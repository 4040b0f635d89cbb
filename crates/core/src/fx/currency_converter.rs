//! Currency conversion against a single base-relative rate table.
//!
//! Conversion is total: when a usable rate is missing the amount comes back
//! unchanged instead of erroring. A missing rate must never corrupt or abort
//! a valuation built over inherently incomplete, user-entered history; the
//! table's `is_fallback` flag travels with the resolver output so callers
//! can still warn about stale data.

use log::debug;
use rust_decimal::Decimal;

use crate::fx::currency::same_currency;
use crate::fx::fx_model::ExchangeRateTable;

/// Converts `amount` from `from_currency` into `to_currency` using `table`.
///
/// Both legs go through the base currency: `amount / rate(from) * rate(to)`,
/// where the base's own rate is 1. If either leg has no usable rate (missing
/// or zero) the amount is returned unchanged. Same-currency conversions are
/// the identity regardless of the table, and zero converts to zero.
pub fn convert_amount(
    amount: Decimal,
    from_currency: &str,
    to_currency: &str,
    table: &ExchangeRateTable,
) -> Decimal {
    if amount.is_zero() {
        return Decimal::ZERO;
    }
    if same_currency(from_currency, to_currency) {
        return amount;
    }

    let from_rate = match table.rate_for(from_currency) {
        Some(rate) => rate,
        None => {
            debug!(
                "No usable rate for {} against base {}; returning amount unconverted",
                from_currency, table.base_currency
            );
            return amount;
        }
    };
    let to_rate = match table.rate_for(to_currency) {
        Some(rate) => rate,
        None => {
            debug!(
                "No usable rate for {} against base {}; returning amount unconverted",
                to_currency, table.base_currency
            );
            return amount;
        }
    };

    amount / from_rate * to_rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd_table() -> ExchangeRateTable {
        ExchangeRateTable::empty("USD")
            .with_rate("EUR", dec!(0.85))
            .with_rate("JPY", dec!(110))
    }

    #[test]
    fn test_base_to_quoted() {
        assert_eq!(convert_amount(dec!(100), "USD", "EUR", &usd_table()), dec!(85));
    }

    #[test]
    fn test_quoted_to_base() {
        assert_eq!(convert_amount(dec!(85), "EUR", "USD", &usd_table()), dec!(100));
    }

    #[test]
    fn test_cross_currency_via_base() {
        // 85 EUR -> 100 USD -> 11000 JPY
        assert_eq!(
            convert_amount(dec!(85), "EUR", "JPY", &usd_table()),
            dec!(11000)
        );
    }

    #[test]
    fn test_missing_rate_passes_through() {
        assert_eq!(
            convert_amount(dec!(100), "EUR", "GBP", &usd_table()),
            dec!(100)
        );
        assert_eq!(
            convert_amount(dec!(100), "USD", "GBP", &usd_table()),
            dec!(100)
        );
        assert_eq!(
            convert_amount(dec!(100), "GBP", "USD", &usd_table()),
            dec!(100)
        );
    }

    #[test]
    fn test_empty_table_is_a_no_op() {
        let table = ExchangeRateTable::empty("USD");
        assert_eq!(convert_amount(dec!(42.5), "EUR", "JPY", &table), dec!(42.5));
    }

    #[test]
    fn test_same_currency_ignores_table() {
        let table = ExchangeRateTable::empty("USD");
        assert_eq!(convert_amount(dec!(123), "EUR", "eur", &table), dec!(123));
        assert_eq!(
            convert_amount(dec!(123), "usd", "USD", &usd_table()),
            dec!(123)
        );
    }

    #[test]
    fn test_zero_rate_passes_through() {
        let table = ExchangeRateTable::empty("USD").with_rate("EUR", Decimal::ZERO);
        assert_eq!(convert_amount(dec!(100), "EUR", "USD", &table), dec!(100));
        assert_eq!(convert_amount(dec!(100), "USD", "EUR", &table), dec!(100));
    }

    #[test]
    fn test_zero_amount_converts_to_zero() {
        let table = ExchangeRateTable::empty("USD");
        assert_eq!(
            convert_amount(Decimal::ZERO, "EUR", "GBP", &table),
            Decimal::ZERO
        );
    }
}
