//! Pure return calculations over resolved, currency-normalized values.
//!
//! Every function here is stateless and total over its defined domain.
//! Where a metric is mathematically meaningless for the inputs it returns
//! `None` - callers must treat absence as "not yet computable", never as a
//! failure, and a single absent metric must not stop the others from being
//! computed.

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::constants::DECIMAL_PRECISION;
use crate::portfolio::performance::{
    PerformanceMetrics, PeriodCashFlow, ReturnData, ValuationPoint,
};

const DAYS_PER_YEAR_DECIMAL: Decimal = dec!(365.25);
const ONE_HUNDRED: Decimal = dec!(100);

/// Simple growth rate `(end - begin) / begin`.
/// Undefined when the beginning value is not positive.
pub fn growth_rate(begin: Decimal, end: Decimal) -> Option<Decimal> {
    if begin <= Decimal::ZERO {
        return None;
    }
    Some((end - begin) / begin)
}

/// Modified Dietz return over a period of `total_days` days.
///
/// Each flow is weighted by the share of the period it was invested:
/// `(total_days - days_since_start) / total_days`. A flow on day 0 carries
/// full weight, a flow on the last day carries none; both are valid
/// boundaries. Undefined when the beginning value is not positive, the
/// period has no length, or the weighted denominator is not positive (e.g.
/// a withdrawal larger than the weighted base).
pub fn modified_dietz_return(
    begin: Decimal,
    end: Decimal,
    cash_flows: &[PeriodCashFlow],
    total_days: i64,
) -> Option<Decimal> {
    if begin <= Decimal::ZERO || total_days <= 0 {
        return None;
    }

    let total = Decimal::from(total_days);
    let mut net_flow = Decimal::ZERO;
    let mut weighted_flow = Decimal::ZERO;
    for flow in cash_flows {
        let day = Decimal::from(flow.days_since_start);
        let weight = (total - day) / total;
        net_flow += flow.amount;
        weighted_flow += flow.amount * weight;
    }

    let denominator = begin + weighted_flow;
    if denominator <= Decimal::ZERO {
        return None;
    }

    Some((end - begin - net_flow) / denominator)
}

/// Chains sub-period returns multiplicatively: `Π(1 + r) - 1`.
/// An empty series has zero cumulative change (identity, not absence).
pub fn cumulative_twr(period_returns: &[Decimal]) -> Decimal {
    period_returns
        .iter()
        .fold(Decimal::ONE, |growth, r| growth * (Decimal::ONE + r))
        - Decimal::ONE
}

/// Builds the point-by-point cumulative series for a list of period returns,
/// neutralizing undefined periods to the identity multiplier.
///
/// The last point of the result always equals `cumulative_twr` over the same
/// neutralized periods - histories and totals may never disagree.
pub fn cumulative_twr_history(period_returns: &[Option<Decimal>]) -> Vec<Decimal> {
    let mut history = Vec::with_capacity(period_returns.len());
    let mut growth = Decimal::ONE;
    for period_return in period_returns {
        growth *= Decimal::ONE + period_return.unwrap_or(Decimal::ZERO);
        history.push(growth - Decimal::ONE);
    }
    history
}

/// Compound annual growth rate `(end/begin)^(1/years) - 1`.
///
/// Undefined when the beginning value or the year count is not positive.
/// Fractional years are valid. A portfolio that fell to zero or below caps
/// at -100% a year; a fractional power of a non-positive ratio has no real
/// value to report.
pub fn cagr(begin: Decimal, end: Decimal, years: Decimal) -> Option<Decimal> {
    if begin <= Decimal::ZERO || years <= Decimal::ZERO {
        return None;
    }
    let ratio = end / begin;
    if ratio <= Decimal::ZERO {
        return Some(dec!(-1));
    }
    Some(ratio.powd(Decimal::ONE / years) - Decimal::ONE)
}

/// Share of the portfolio a category represents, in percent.
/// An empty portfolio allocates zero everywhere, so a non-positive total
/// yields 0 rather than an absent result.
pub fn category_allocation(category_value: Decimal, total_value: Decimal) -> Decimal {
    if total_value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    category_value / total_value * ONE_HUNDRED
}

/// Re-expresses a cumulative return series relative to its first point:
/// `(1 + r_i) / (1 + r_0) - 1`, a ratio of growth factors.
///
/// Works on any contiguous sub-window of a longer series, including windows
/// whose base point is a prior loss. A base point of exactly -100% has no
/// finite rebase; the series degrades to flat zero.
pub fn rebase_returns(series: &[Decimal]) -> Vec<Decimal> {
    let Some(first) = series.first() else {
        return Vec::new();
    };
    let base_growth = Decimal::ONE + *first;
    if base_growth.is_zero() {
        debug!("Cannot rebase a return series whose base point is a total loss");
        return vec![Decimal::ZERO; series.len()];
    }
    series
        .iter()
        .map(|r| (Decimal::ONE + *r) / base_growth - Decimal::ONE)
        .collect()
}

/// Annualizes a total return over a date range.
///
/// Periods under a year report the total return unchanged; losses of 100%
/// or more cap at -100%.
pub fn annualized_return(
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_return: Decimal,
) -> Decimal {
    if start_date > end_date {
        return Decimal::ZERO;
    }
    if total_return <= dec!(-1.0) {
        return dec!(-1.0);
    }

    let days = (end_date - start_date).num_days();
    if days <= 0 {
        return total_return;
    }

    let years = Decimal::from(days) / DAYS_PER_YEAR_DECIMAL;
    if years < Decimal::ONE {
        return total_return;
    }

    let base = Decimal::ONE + total_return;
    if base <= Decimal::ZERO {
        return dec!(-1.0);
    }

    base.powd(Decimal::ONE / years) - Decimal::ONE
}

/// Sample standard deviation of period returns. Snapshot periods are
/// irregular, so no trading-day annualization factor is applied.
pub fn volatility(period_returns: &[Decimal]) -> Decimal {
    if period_returns.len() < 2 {
        return Decimal::ZERO;
    }

    let count = Decimal::from(period_returns.len());
    let sum: Decimal = period_returns.iter().sum();
    let mean = sum / count;

    let sum_squared_diff: Decimal = period_returns
        .iter()
        .map(|&r| {
            let diff = r - mean;
            diff * diff
        })
        .sum();

    let variance = sum_squared_diff / (count - Decimal::ONE);
    if variance.is_sign_negative() {
        return Decimal::ZERO;
    }

    variance.sqrt().unwrap_or(Decimal::ZERO)
}

/// Largest peak-to-trough decline of the chained growth series.
pub fn max_drawdown(period_returns: &[Decimal]) -> Decimal {
    if period_returns.is_empty() {
        return Decimal::ZERO;
    }

    let mut cumulative_value = Decimal::ONE;
    let mut peak_value = Decimal::ONE;
    let mut max_drawdown = Decimal::ZERO;

    for &period_return in period_returns {
        cumulative_value *= Decimal::ONE + period_return;
        peak_value = peak_value.max(cumulative_value);
        if peak_value.is_zero() {
            max_drawdown = max_drawdown.max(Decimal::ONE);
        } else {
            let drawdown = (peak_value - cumulative_value) / peak_value;
            max_drawdown = max_drawdown.max(drawdown);
        }
    }

    max_drawdown.max(Decimal::ZERO)
}

/// Computes the full performance picture over a window of valuation points.
///
/// Points must be in chronological order - one per snapshot, with the net
/// external flow recorded in that snapshot. Flows sit on the closing day of
/// the period their snapshot ends (the user enters a flow together with the
/// values it produced), so they carry zero Dietz weight within that period.
/// Fewer than two points yields empty metrics.
pub fn calculate_performance(points: &[ValuationPoint], currency: &str) -> PerformanceMetrics {
    if points.len() < 2 {
        warn!(
            "Not enough valuation history ({} points); returning empty metrics",
            points.len()
        );
        return PerformanceMetrics::empty(currency);
    }

    let start_point = points.first().unwrap();
    let end_point = points.last().unwrap();
    let start_date = start_point.date;
    let end_date = end_point.date;

    // Per-period Modified Dietz returns between consecutive snapshots.
    let mut period_returns: Vec<Option<Decimal>> = Vec::with_capacity(points.len() - 1);
    for window in points.windows(2) {
        let prev = &window[0];
        let curr = &window[1];
        let total_days = (curr.date - prev.date).num_days();
        let flows = [PeriodCashFlow {
            amount: curr.net_external_flow,
            days_since_start: total_days,
        }];
        period_returns.push(modified_dietz_return(
            prev.total_value,
            curr.total_value,
            &flows,
            total_days,
        ));
    }

    let history = cumulative_twr_history(&period_returns);
    let mut returns = Vec::with_capacity(points.len());
    returns.push(ReturnData {
        date: start_date,
        value: Decimal::ZERO,
    });
    for (point, value) in points[1..].iter().zip(&history) {
        returns.push(ReturnData {
            date: point.date,
            value: value.round_dp(DECIMAL_PRECISION),
        });
    }

    let cumulative = history.last().copied().unwrap_or(Decimal::ZERO);
    let annualized_twr = annualized_return(start_date, end_date, cumulative);

    // Whole-window metrics. Flows in the first snapshot predate the window.
    let net_cash_flow: Decimal = points[1..].iter().map(|p| p.net_external_flow).sum();
    let window_flows: Vec<PeriodCashFlow> = points[1..]
        .iter()
        .map(|p| PeriodCashFlow {
            amount: p.net_external_flow,
            days_since_start: (p.date - start_date).num_days(),
        })
        .collect();
    let window_days = (end_date - start_date).num_days();

    let gain_loss_amount = end_point.total_value - start_point.total_value - net_cash_flow;
    let whole_window_growth = growth_rate(start_point.total_value, end_point.total_value);
    let whole_window_dietz = modified_dietz_return(
        start_point.total_value,
        end_point.total_value,
        &window_flows,
        window_days,
    );
    let years = Decimal::from(window_days.max(0)) / DAYS_PER_YEAR_DECIMAL;
    let window_cagr = cagr(start_point.total_value, end_point.total_value, years);

    let neutralized: Vec<Decimal> = period_returns
        .iter()
        .map(|r| r.unwrap_or(Decimal::ZERO))
        .collect();

    PerformanceMetrics {
        currency: currency.to_string(),
        period_start_date: Some(start_date),
        period_end_date: Some(end_date),
        returns,
        cumulative_twr: cumulative.round_dp(DECIMAL_PRECISION),
        annualized_twr: annualized_twr.round_dp(DECIMAL_PRECISION),
        growth_rate: whole_window_growth.map(|r| r.round_dp(DECIMAL_PRECISION)),
        modified_dietz: whole_window_dietz.map(|r| r.round_dp(DECIMAL_PRECISION)),
        cagr: window_cagr.map(|r| r.round_dp(DECIMAL_PRECISION)),
        gain_loss_amount: Some(gain_loss_amount.round_dp(DECIMAL_PRECISION)),
        volatility: volatility(&neutralized).round_dp(DECIMAL_PRECISION),
        max_drawdown: max_drawdown(&neutralized).round_dp(DECIMAL_PRECISION),
    }
}
