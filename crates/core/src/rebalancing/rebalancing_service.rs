//! Turns current vs. target allocations into a short list of buy/sell
//! actions and plain-language transfer suggestions.
//!
//! Transfers are matched greedily - largest remaining surplus against
//! largest remaining deficit - so the number of suggested movements stays
//! below the category count and their total equals the true net imbalance.
//! Pairing every sell with every buy would overstate both.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::categories::Category;
use crate::constants::{DISPLAY_DECIMAL_PRECISION, UNCATEGORIZED_LABEL};
use crate::portfolio::performance::category_allocation;
use crate::portfolio::valuation::EffectiveValuation;
use crate::rebalancing::{
    AllocationRow, RebalanceAction, RebalancePlan, RebalanceSuggestion, Transfer,
};

/// Differences smaller than one currency unit are not worth a trade.
const MIN_ACTION_AMOUNT: Decimal = Decimal::ONE;

/// Tolerance when checking that targets sum to 100 percent.
const TARGET_SUM_TOLERANCE: Decimal = dec!(0.01);

/// Builds the rebalancing plan for one resolved valuation.
///
/// Only categories with a configured target receive suggestions; the rest
/// appear as informational rows, as does the uncategorized bucket. A target
/// sum other than 100 percent sets a warning but changes nothing else - the
/// two conditions are independent.
pub fn build_rebalance_plan(
    valuation: &EffectiveValuation,
    categories: &[Category],
) -> RebalancePlan {
    let grand_total = valuation.total_value;

    let mut ordered: Vec<&Category> = categories.iter().collect();
    ordered.sort_by_key(|category| category.display_order);

    let mut suggestions: Vec<RebalanceSuggestion> = Vec::new();
    let mut no_target_rows: Vec<AllocationRow> = Vec::new();
    let mut target_sum = Decimal::ZERO;
    let mut has_target = false;

    for category in &ordered {
        let current_value = valuation
            .category_value(&category.id)
            .unwrap_or(Decimal::ZERO);
        let current_percentage =
            category_allocation(current_value, grand_total).round_dp(DISPLAY_DECIMAL_PRECISION);

        match category.target_allocation {
            Some(target_percentage) => {
                has_target = true;
                target_sum += target_percentage;

                let target_value = target_percentage / dec!(100) * grand_total;
                let difference = current_value - target_value;
                let action = if difference.abs() < MIN_ACTION_AMOUNT {
                    RebalanceAction::Hold
                } else if difference > Decimal::ZERO {
                    RebalanceAction::Sell
                } else {
                    RebalanceAction::Buy
                };

                suggestions.push(RebalanceSuggestion {
                    category_id: category.id.clone(),
                    category_name: category.name.clone(),
                    current_value,
                    current_percentage,
                    target_percentage,
                    difference,
                    action,
                });
            }
            None => {
                // Informational only; silent when the category holds nothing.
                if valuation.category_value(&category.id).is_some() {
                    no_target_rows.push(AllocationRow {
                        name: category.name.clone(),
                        current_value,
                        current_percentage,
                    });
                }
            }
        }
    }

    let uncategorized_row = valuation
        .categories
        .iter()
        .find(|group| group.category_id.is_none())
        .map(|group| AllocationRow {
            name: UNCATEGORIZED_LABEL.to_string(),
            current_value: group.value,
            current_percentage: group.percentage,
        });

    if grand_total <= Decimal::ZERO || !has_target {
        debug!("No rebalancing possible: total {} / targets {}", grand_total, has_target);
        return RebalancePlan {
            suggestions: Vec::new(),
            no_target_rows,
            uncategorized_row,
            summary_texts: Vec::new(),
            target_sum_warning: None,
        };
    }

    // Largest imbalance first; stable sort keeps equal magnitudes in
    // category display order.
    suggestions.sort_by(|a, b| b.difference.abs().cmp(&a.difference.abs()));

    let sells: Vec<(String, Decimal)> = suggestions
        .iter()
        .filter(|s| s.action == RebalanceAction::Sell)
        .map(|s| (s.category_name.clone(), s.difference))
        .collect();
    let buys: Vec<(String, Decimal)> = suggestions
        .iter()
        .filter(|s| s.action == RebalanceAction::Buy)
        .map(|s| (s.category_name.clone(), -s.difference))
        .collect();

    let transfers = match_transfers(&sells, &buys);
    let summary_texts = transfers
        .iter()
        .map(|transfer| {
            format!(
                "Move {:.2} {} from {} to {}",
                transfer.amount,
                valuation.display_currency,
                transfer.from_category,
                transfer.to_category
            )
        })
        .collect();

    let target_sum_warning = if (target_sum - dec!(100)).abs() > TARGET_SUM_TOLERANCE {
        Some(format!(
            "Target allocations sum to {}%, not 100%",
            target_sum.normalize()
        ))
    } else {
        None
    };

    RebalancePlan {
        suggestions,
        no_target_rows,
        uncategorized_row,
        summary_texts,
        target_sum_warning,
    }
}

/// Greedily matches surpluses against deficits.
///
/// Repeatedly pairs the largest remaining sell with the largest remaining
/// buy and moves the smaller of the two remainders; whichever side reaches
/// zero drops out. Every step retires at least one side, so at most
/// `sells + buys - 1` transfers are emitted and their total equals the
/// smaller of the two imbalances.
pub fn match_transfers(sells: &[(String, Decimal)], buys: &[(String, Decimal)]) -> Vec<Transfer> {
    let mut sells: Vec<(String, Decimal)> = sells
        .iter()
        .filter(|(_, amount)| *amount > Decimal::ZERO)
        .cloned()
        .collect();
    let mut buys: Vec<(String, Decimal)> = buys
        .iter()
        .filter(|(_, amount)| *amount > Decimal::ZERO)
        .cloned()
        .collect();

    let mut transfers = Vec::new();
    while !sells.is_empty() && !buys.is_empty() {
        let sell_idx = index_of_largest(&sells);
        let buy_idx = index_of_largest(&buys);
        let amount = sells[sell_idx].1.min(buys[buy_idx].1);

        transfers.push(Transfer {
            from_category: sells[sell_idx].0.clone(),
            to_category: buys[buy_idx].0.clone(),
            amount,
        });

        sells[sell_idx].1 -= amount;
        buys[buy_idx].1 -= amount;
        if sells[sell_idx].1.is_zero() {
            sells.remove(sell_idx);
        }
        if buys[buy_idx].1.is_zero() {
            buys.remove(buy_idx);
        }
    }

    transfers
}

/// First index holding the largest amount (first wins on ties, keeping the
/// caller's ordering stable).
fn index_of_largest(entries: &[(String, Decimal)]) -> usize {
    let mut largest = 0;
    for (idx, entry) in entries.iter().enumerate().skip(1) {
        if entry.1 > entries[largest].1 {
            largest = idx;
        }
    }
    largest
}
