use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::categories::Category;
use crate::portfolio::performance::category_allocation;
use crate::portfolio::valuation::{CategoryValuation, EffectiveValuation};
use crate::rebalancing::{build_rebalance_plan, match_transfers, RebalanceAction};

fn category(id: &str, name: &str, target: Option<Decimal>, order: i32) -> Category {
    let mut category = Category::new(name, order);
    category.id = id.to_string();
    category.target_allocation = target;
    category
}

/// Builds a valuation holding only category aggregates, which is all the
/// suggestion engine reads.
fn valuation(groups: &[(Option<&str>, &str, Decimal)]) -> EffectiveValuation {
    let total_value: Decimal = groups.iter().map(|(_, _, value)| *value).sum();
    let categories = groups
        .iter()
        .map(|(id, name, value)| CategoryValuation {
            category_id: id.map(|s| s.to_string()),
            name: name.to_string(),
            value: *value,
            percentage: category_allocation(*value, total_value).round_dp(2),
        })
        .collect();

    EffectiveValuation {
        as_of: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        display_currency: "USD".to_string(),
        total_value,
        positions: Vec::new(),
        categories,
        rates_are_fallback: false,
    }
}

#[test]
fn test_sixty_forty_scenario() {
    let categories = vec![
        category("eq", "Equities", Some(dec!(60)), 0),
        category("bd", "Bonds", Some(dec!(40)), 1),
    ];
    let valuation = valuation(&[
        (Some("eq"), "Equities", dec!(7000)),
        (Some("bd"), "Bonds", dec!(3000)),
    ]);

    let plan = build_rebalance_plan(&valuation, &categories);

    assert_eq!(plan.suggestions.len(), 2);
    let equities = &plan.suggestions[0];
    let bonds = &plan.suggestions[1];
    assert_eq!(equities.action, RebalanceAction::Sell);
    assert_eq!(equities.difference, dec!(1000));
    assert_eq!(bonds.action, RebalanceAction::Buy);
    assert_eq!(bonds.difference, dec!(-1000));

    assert_eq!(
        plan.summary_texts,
        vec!["Move 1000.00 USD from Equities to Bonds".to_string()]
    );
    assert!(plan.target_sum_warning.is_none());
}

#[test]
fn test_greedy_matching_never_produces_cartesian_count() {
    // Two oversized categories ($4,000 surplus) against two undersized
    // ($4,000 deficit). The Cartesian pairing would emit 4 texts implying
    // $8,000 of movement; the greedy match must stay at <= 3 texts moving
    // exactly $4,000.
    let categories = vec![
        category("a", "Alpha", Some(dec!(10)), 0),
        category("b", "Beta", Some(dec!(15)), 1),
        category("c", "Gamma", Some(dec!(40)), 2),
        category("d", "Delta", Some(dec!(35)), 3),
    ];
    let valuation = valuation(&[
        (Some("a"), "Alpha", dec!(4500)),
        (Some("b"), "Beta", dec!(4500)),
        (Some("c"), "Gamma", dec!(5000)),
        (Some("d"), "Delta", dec!(6000)),
    ]);

    let plan = build_rebalance_plan(&valuation, &categories);

    let sell_count = plan
        .suggestions
        .iter()
        .filter(|s| s.action == RebalanceAction::Sell)
        .count();
    let buy_count = plan
        .suggestions
        .iter()
        .filter(|s| s.action == RebalanceAction::Buy)
        .count();
    assert_eq!(sell_count, 2);
    assert_eq!(buy_count, 2);

    // The explicit guard: the Cartesian count must never occur.
    assert_ne!(plan.summary_texts.len(), sell_count * buy_count);
    assert!(plan.summary_texts.len() <= sell_count + buy_count - 1);
}

#[test]
fn test_match_transfers_conserves_total_imbalance() {
    let sells = vec![
        ("Alpha".to_string(), dec!(2500)),
        ("Beta".to_string(), dec!(1500)),
    ];
    let buys = vec![
        ("Gamma".to_string(), dec!(3000)),
        ("Delta".to_string(), dec!(1000)),
    ];

    let transfers = match_transfers(&sells, &buys);

    let moved: Decimal = transfers.iter().map(|t| t.amount).sum();
    assert_eq!(moved, dec!(4000));
    assert!(transfers.len() <= 3);

    // Largest surplus pairs with largest deficit first.
    assert_eq!(transfers[0].from_category, "Alpha");
    assert_eq!(transfers[0].to_category, "Gamma");
    assert_eq!(transfers[0].amount, dec!(2500));
}

#[test]
fn test_match_transfers_unbalanced_sides() {
    // More surplus than deficit: transfers stop when the buys are filled.
    let sells = vec![("Alpha".to_string(), dec!(5000))];
    let buys = vec![("Beta".to_string(), dec!(2000))];

    let transfers = match_transfers(&sells, &buys);
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].amount, dec!(2000));
}

#[test]
fn test_trivial_differences_become_hold() {
    let categories = vec![
        category("eq", "Equities", Some(dec!(60)), 0),
        category("bd", "Bonds", Some(dec!(40)), 1),
    ];
    // 6000.50 vs target 6000.30: off by 50 cents, below one currency unit.
    let valuation = valuation(&[
        (Some("eq"), "Equities", dec!(6000.50)),
        (Some("bd"), "Bonds", dec!(4000)),
    ]);

    let plan = build_rebalance_plan(&valuation, &categories);
    let equities = plan
        .suggestions
        .iter()
        .find(|s| s.category_name == "Equities")
        .unwrap();
    assert_eq!(equities.action, RebalanceAction::Hold);
    // Holds never generate transfer texts.
    assert!(plan.summary_texts.is_empty());
}

#[test]
fn test_suggestions_sorted_by_absolute_imbalance() {
    let categories = vec![
        category("a", "Alpha", Some(dec!(50)), 0),
        category("b", "Beta", Some(dec!(30)), 1),
        category("c", "Gamma", Some(dec!(20)), 2),
    ];
    // Total 10000: Alpha off by -500, Beta by +1500, Gamma by -1000.
    let valuation = valuation(&[
        (Some("a"), "Alpha", dec!(4500)),
        (Some("b"), "Beta", dec!(4500)),
        (Some("c"), "Gamma", dec!(1000)),
    ]);

    let plan = build_rebalance_plan(&valuation, &categories);
    let names: Vec<_> = plan
        .suggestions
        .iter()
        .map(|s| s.category_name.as_str())
        .collect();
    assert_eq!(names, vec!["Beta", "Gamma", "Alpha"]);
}

#[test]
fn test_untargeted_categories_are_informational_only() {
    let categories = vec![
        category("eq", "Equities", Some(dec!(60)), 0),
        category("bd", "Bonds", Some(dec!(40)), 1),
        category("gold", "Gold", None, 2),
    ];
    let valuation = valuation(&[
        (Some("eq"), "Equities", dec!(7000)),
        (Some("bd"), "Bonds", dec!(3000)),
        (Some("gold"), "Gold", dec!(2000)),
        (None, "Uncategorized", dec!(500)),
    ]);

    let plan = build_rebalance_plan(&valuation, &categories);

    assert!(plan.suggestions.iter().all(|s| s.category_name != "Gold"));
    assert!(plan
        .summary_texts
        .iter()
        .all(|text| !text.contains("Gold") && !text.contains("Uncategorized")));
    assert_eq!(plan.no_target_rows.len(), 1);
    assert_eq!(plan.no_target_rows[0].name, "Gold");
    let uncategorized = plan.uncategorized_row.unwrap();
    assert_eq!(uncategorized.current_value, dec!(500));
}

#[test]
fn test_missing_target_and_bad_sum_are_independent() {
    // Targets sum to 70: warning fires, but the untargeted category is
    // still excluded and the targeted ones still get suggestions.
    let categories = vec![
        category("eq", "Equities", Some(dec!(50)), 0),
        category("bd", "Bonds", Some(dec!(20)), 1),
        category("gold", "Gold", None, 2),
    ];
    let valuation = valuation(&[
        (Some("eq"), "Equities", dec!(7000)),
        (Some("bd"), "Bonds", dec!(3000)),
        (Some("gold"), "Gold", dec!(2000)),
    ]);

    let plan = build_rebalance_plan(&valuation, &categories);

    assert_eq!(plan.suggestions.len(), 2);
    assert!(plan.target_sum_warning.is_some());
    assert!(plan.target_sum_warning.unwrap().contains("70"));
    assert_eq!(plan.no_target_rows.len(), 1);
}

#[test]
fn test_zero_total_portfolio_yields_no_suggestions() {
    let categories = vec![category("eq", "Equities", Some(dec!(60)), 0)];
    let valuation = valuation(&[]);

    let plan = build_rebalance_plan(&valuation, &categories);
    assert!(plan.suggestions.is_empty());
    assert!(plan.summary_texts.is_empty());
}

#[test]
fn test_no_targeted_categories_yields_no_suggestions() {
    let categories = vec![category("gold", "Gold", None, 0)];
    let valuation = valuation(&[(Some("gold"), "Gold", dec!(5000))]);

    let plan = build_rebalance_plan(&valuation, &categories);
    assert!(plan.suggestions.is_empty());
    assert!(plan.summary_texts.is_empty());
    assert_eq!(plan.no_target_rows.len(), 1);
}

#[test]
fn test_empty_targeted_category_gets_buy_suggestion() {
    // A targeted category holding nothing is still undersized.
    let categories = vec![
        category("eq", "Equities", Some(dec!(60)), 0),
        category("bd", "Bonds", Some(dec!(40)), 1),
    ];
    let valuation = valuation(&[(Some("eq"), "Equities", dec!(10000))]);

    let plan = build_rebalance_plan(&valuation, &categories);
    let bonds = plan
        .suggestions
        .iter()
        .find(|s| s.category_name == "Bonds")
        .unwrap();
    assert_eq!(bonds.action, RebalanceAction::Buy);
    assert_eq!(bonds.difference, dec!(-4000));
}
