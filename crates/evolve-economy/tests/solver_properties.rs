//! Property-based tests for the payment solver.
//!
//! Random small costs, production slots and neighbor markets; every
//! published option must pay the cost exactly and no published option may
//! dominate another.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::arithmetic_side_effects)]

use std::collections::BTreeMap;

use evolve_economy::{
    Cost, Market, PaymentOption, ProductionSlot, Yield, enumerate_payments, payment_options,
};
use proptest::prelude::*;

const RESOURCES: [&str; 3] = ["wood", "stone", "clay"];

fn resource() -> impl Strategy<Value = String> {
    prop::sample::select(RESOURCES.to_vec()).prop_map(str::to_owned)
}

fn slot() -> impl Strategy<Value = ProductionSlot> {
    prop_oneof![
        (1u32..3, resource()).prop_map(|(amount, r)| ProductionSlot::Single(Yield::new(amount, r))),
        (resource(), resource()).prop_map(|(a, b)| {
            ProductionSlot::OneOf(vec![Yield::new(1, a), Yield::new(1, b)])
        }),
    ]
}

fn cost() -> impl Strategy<Value = Cost> {
    (0u32..4, prop::collection::vec((resource(), 0u32..3), 0..3)).prop_map(|(money, lines)| {
        lines
            .into_iter()
            .fold(Cost::money_only(money), |cost, (r, amount)| cost.with_resource(r, amount))
    })
}

fn prices() -> impl Strategy<Value = BTreeMap<String, u32>> {
    prop::collection::btree_map(resource(), 0u32..3, 0..3)
}

fn produced(slots: &[ProductionSlot], resource: &str) -> u32 {
    slots
        .iter()
        .map(|slot| {
            slot.alternatives()
                .iter()
                .filter(|y| y.resource == resource)
                .map(|y| y.amount)
                .max()
                .unwrap_or(0)
        })
        .sum()
}

fn covers_exactly(option: &PaymentOption, cost: &Cost) -> bool {
    if option.money != cost.money() {
        return false;
    }
    RESOURCES.iter().all(|r| {
        let paid = option.local.amount(r) + option.left_trade.amount(r) + option.right_trade.amount(r);
        paid == cost.required(r)
    })
}

fn priced_correctly(option: &PaymentOption, left: &BTreeMap<String, u32>, right: &BTreeMap<String, u32>) -> bool {
    let side_ok = |set: &evolve_economy::ResourceSet, prices: &BTreeMap<String, u32>| {
        set.iter().all(|(name, acquired)| {
            prices.get(name).copied().unwrap_or(0) * acquired.amount == acquired.cost
        })
    };
    side_ok(&option.left_trade, left) && side_ok(&option.right_trade, right)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Every published option pays the money component and every resource
    /// requirement exactly, within the buyer's budget.
    #[test]
    fn prop_options_pay_exactly(
        cost in cost(),
        money in 0u32..10,
        local in prop::collection::vec(slot(), 0..3),
        left_slots in prop::collection::vec(slot(), 0..3),
        right_slots in prop::collection::vec(slot(), 0..3),
        left_prices in prices(),
        right_prices in prices(),
    ) {
        let options = payment_options(
            &cost,
            money,
            &local,
            Market::new(&left_slots, &left_prices),
            Market::new(&right_slots, &right_prices),
        );
        for option in &options {
            prop_assert!(covers_exactly(option, &cost));
            prop_assert!(priced_correctly(option, &left_prices, &right_prices));
            prop_assert!(option.total_cost() <= money);
            for r in RESOURCES {
                prop_assert!(option.local.amount(r) <= produced(&local, r));
                prop_assert!(option.left_trade.amount(r) <= produced(&left_slots, r));
                prop_assert!(option.right_trade.amount(r) <= produced(&right_slots, r));
            }
        }
    }

    /// No published option strictly dominates another, and cleaning only
    /// ever removes candidates.
    #[test]
    fn prop_no_dominated_options(
        cost in cost(),
        money in 0u32..10,
        local in prop::collection::vec(slot(), 0..2),
        left_slots in prop::collection::vec(slot(), 0..3),
        right_slots in prop::collection::vec(slot(), 0..3),
        left_prices in prices(),
        right_prices in prices(),
    ) {
        let left = Market::new(&left_slots, &left_prices);
        let right = Market::new(&right_slots, &right_prices);
        let raw = enumerate_payments(&cost, money, &local, left, right);
        let options = payment_options(&cost, money, &local, left, right);

        prop_assert_eq!(raw.is_empty(), options.is_empty());
        for a in &options {
            prop_assert!(raw.contains(a));
            for b in &options {
                prop_assert!(!a.strictly_dominates(b));
            }
        }
    }

    /// Money beyond the budget is never payable without resources.
    #[test]
    fn prop_money_shortfall_is_unpayable(required in 1u32..20, money in 0u32..20) {
        let options = payment_options(
            &Cost::money_only(required),
            money,
            &[],
            Market::closed(),
            Market::closed(),
        );
        prop_assert_eq!(options.is_empty(), required > money);
    }
}
