//! The payment solver.
//!
//! Enumerates every way to pay a [`Cost`] from, in strict priority order:
//!
//! 1. money, for the money component (never substituted);
//! 2. the buyer's own production slots;
//! 3. slots bought from the left neighbor;
//! 4. slots bought from the right neighbor.
//!
//! Each slot is either skipped or used for one of its alternatives, so the
//! search is a Cartesian enumeration rather than a greedy pick: it returns
//! every distinct combination. Usage is clipped to what is still required.
//! Traded units are bought one price step at a time, so buying one, two, ...
//! units from the same neighbor slot are separate options.
//!
//! [`payment_options`] then removes options that are strictly dominated
//! (more expensive towards both neighbors) by another option. An empty
//! result means the cost cannot be paid.

use std::collections::BTreeMap;

use evolve_types::Direction;
use tracing::trace;

use crate::cost::Cost;
use crate::payment::PaymentOption;
use crate::production::{Market, ProductionSlot};

/// The resource tiers still available to a branch of the search.
#[derive(Debug, Clone, Copy)]
struct Tiers<'a> {
    local: &'a [ProductionSlot],
    left: Market<'a>,
    right: Market<'a>,
}

/// Every non-dominated way to pay `cost`.
///
/// `money` is what the buyer can spend in total; `local` is the buyer's own
/// production; `left` and `right` are what the neighbors sell. The caller's
/// cost is never modified.
pub fn payment_options(
    cost: &Cost,
    money: u32,
    local: &[ProductionSlot],
    left: Market<'_>,
    right: Market<'_>,
) -> Vec<PaymentOption> {
    let candidates = enumerate_payments(cost, money, local, left, right);
    let found = candidates.len();
    let cleaned = clean(candidates);
    trace!(%cost, money, found, kept = cleaned.len(), "Payment options computed");
    cleaned
}

/// Every way to pay `cost`, before dominance filtering.
///
/// May contain duplicates and dominated options; exposed for inspection.
pub fn enumerate_payments(
    cost: &Cost,
    money: u32,
    local: &[ProductionSlot],
    left: Market<'_>,
    right: Market<'_>,
) -> Vec<PaymentOption> {
    explore(cost.clone(), money, Tiers { local, left, right })
}

/// Remove duplicates and strictly dominated options.
///
/// Options are ordered by total trade cost, then by left trade cost, so a
/// dominating option is always visited before the options it dominates.
pub fn clean(mut options: Vec<PaymentOption>) -> Vec<PaymentOption> {
    options.sort_by_key(|option| (option.trade_cost(), option.left_cost()));
    let mut kept: Vec<PaymentOption> = Vec::with_capacity(options.len());
    for candidate in options {
        let redundant = kept
            .iter()
            .any(|earlier| *earlier == candidate || earlier.strictly_dominates(&candidate));
        if !redundant {
            kept.push(candidate);
        }
    }
    kept
}

fn explore(cost: Cost, money: u32, tiers: Tiers<'_>) -> Vec<PaymentOption> {
    if cost.is_free() {
        return vec![PaymentOption::default()];
    }

    let required_money = cost.money();
    if required_money > 0 {
        let Some(remaining) = money.checked_sub(required_money) else {
            return Vec::new();
        };
        let mut results = explore(cost.without_money(), remaining, tiers);
        for option in &mut results {
            option.money = option.money.saturating_add(required_money);
        }
        return results;
    }

    if let Some((slot, rest)) = tiers.local.split_first() {
        return local_branches(&cost, money, slot, Tiers { local: rest, ..tiers });
    }
    if let Some((slot, rest)) = tiers.left.slots.split_first() {
        let prices = tiers.left.prices;
        let rest = Tiers {
            left: tiers.left.rest(rest),
            ..tiers
        };
        return trade_branches(&cost, money, slot, Direction::Left, prices, rest);
    }
    if let Some((slot, rest)) = tiers.right.slots.split_first() {
        let prices = tiers.right.prices;
        let rest = Tiers {
            right: tiers.right.rest(rest),
            ..tiers
        };
        return trade_branches(&cost, money, slot, Direction::Right, prices, rest);
    }

    // Requirements remain and nothing is left to pay them with.
    Vec::new()
}

fn local_branches(
    cost: &Cost,
    money: u32,
    slot: &ProductionSlot,
    rest: Tiers<'_>,
) -> Vec<PaymentOption> {
    let mut results = explore(cost.clone(), money, rest);
    for alternative in slot.alternatives() {
        let needed = cost.required(&alternative.resource);
        if needed == 0 {
            continue;
        }
        let used = alternative.amount.min(needed);
        let mut branch = explore(cost.reduced(&alternative.resource, used), money, rest);
        for option in &mut branch {
            option.local.add(&alternative.resource, used, 0);
        }
        results.append(&mut branch);
    }
    results
}

fn trade_branches(
    cost: &Cost,
    money: u32,
    slot: &ProductionSlot,
    direction: Direction,
    prices: &BTreeMap<String, u32>,
    rest: Tiers<'_>,
) -> Vec<PaymentOption> {
    let mut results = explore(cost.clone(), money, rest);
    for alternative in slot.alternatives() {
        let needed = cost.required(&alternative.resource);
        if needed == 0 {
            continue;
        }
        let Some(price) = prices
            .get(&alternative.resource)
            .copied()
            .filter(|price| *price > 0)
        else {
            continue;
        };
        let most = alternative.amount.min(needed);
        for units in 1..=most {
            let Some(spent) = units.checked_mul(price) else {
                break;
            };
            let Some(remaining) = money.checked_sub(spent) else {
                break;
            };
            let mut branch = explore(cost.reduced(&alternative.resource, units), remaining, rest);
            for option in &mut branch {
                option
                    .trade_mut(direction)
                    .add(&alternative.resource, units, spent);
            }
            results.append(&mut branch);
        }
    }
    results
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::production::Yield;

    fn single(amount: u32, resource: &str) -> ProductionSlot {
        ProductionSlot::Single(Yield::new(amount, resource))
    }

    fn choice(resources: &[&str]) -> ProductionSlot {
        ProductionSlot::OneOf(resources.iter().map(|r| Yield::new(1, *r)).collect())
    }

    fn prices(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
        entries.iter().map(|(r, p)| ((*r).to_owned(), *p)).collect()
    }

    #[test]
    fn free_cost_has_single_empty_option() {
        let options = payment_options(&Cost::free(), 0, &[], Market::closed(), Market::closed());
        assert_eq!(options, vec![PaymentOption::default()]);
    }

    #[test]
    fn money_cost_paid_from_money() {
        let options = payment_options(
            &Cost::money_only(3),
            5,
            &[],
            Market::closed(),
            Market::closed(),
        );
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].money, 3);
        assert_eq!(options[0].trade_cost(), 0);
    }

    #[test]
    fn insufficient_money_is_unpayable() {
        let options = payment_options(
            &Cost::money_only(3),
            2,
            &[single(5, "wood")],
            Market::closed(),
            Market::closed(),
        );
        assert!(options.is_empty());
    }

    #[test]
    fn local_usage_is_clipped_to_need() {
        let cost = Cost::free().with_resource("wood", 2);
        let options = payment_options(&cost, 5, &[single(3, "wood")], Market::closed(), Market::closed());
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].local.amount("wood"), 2);
        assert_eq!(options[0].money, 0);
        assert!(options[0].left_trade.is_empty());
        assert!(options[0].right_trade.is_empty());
    }

    #[test]
    fn insufficient_local_production_is_unpayable() {
        let cost = Cost::free().with_resource("stone", 2);
        let options = payment_options(&cost, 0, &[single(1, "stone")], Market::closed(), Market::closed());
        assert!(options.is_empty());
    }

    #[test]
    fn choice_slot_used_for_one_alternative_only() {
        let cost = Cost::free().with_resource("wood", 1).with_resource("clay", 1);
        let slots = [choice(&["wood", "clay"])];
        let options = payment_options(&cost, 0, &slots, Market::closed(), Market::closed());
        assert!(options.is_empty());

        let slots = [choice(&["wood", "clay"]), single(1, "clay")];
        let options = payment_options(&cost, 0, &slots, Market::closed(), Market::closed());
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].local.amount("wood"), 1);
        assert_eq!(options[0].local.amount("clay"), 1);
    }

    #[test]
    fn trade_units_cost_their_price() {
        let cost = Cost::free().with_resource("ore", 2);
        let left_slots = [single(2, "ore")];
        let left_prices = prices(&[("ore", 2)]);
        let options = payment_options(
            &cost,
            10,
            &[],
            Market::new(&left_slots, &left_prices),
            Market::closed(),
        );
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].left_trade.amount("ore"), 2);
        assert_eq!(options[0].left_cost(), 4);
    }

    #[test]
    fn trade_limited_by_money() {
        let cost = Cost::free().with_resource("ore", 2);
        let left_slots = [single(2, "ore")];
        let left_prices = prices(&[("ore", 2)]);
        let options = payment_options(
            &cost,
            3,
            &[],
            Market::new(&left_slots, &left_prices),
            Market::closed(),
        );
        assert!(options.is_empty());
    }

    #[test]
    fn money_component_reduces_trade_budget() {
        let cost = Cost::money_only(2).with_resource("ore", 1);
        let right_slots = [single(1, "ore")];
        let right_prices = prices(&[("ore", 2)]);
        let right = Market::new(&right_slots, &right_prices);
        assert!(payment_options(&cost, 3, &[], Market::closed(), right).is_empty());

        let options = payment_options(&cost, 4, &[], Market::closed(), right);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].money, 2);
        assert_eq!(options[0].right_cost(), 2);
    }

    #[test]
    fn unpriced_resources_cannot_be_bought() {
        let cost = Cost::free().with_resource("glass", 1);
        let left_slots = [single(1, "glass")];
        let left_prices = prices(&[("glass", 0)]);
        let options = payment_options(
            &cost,
            10,
            &[],
            Market::new(&left_slots, &left_prices),
            Market::closed(),
        );
        assert!(options.is_empty());
    }

    #[test]
    fn split_purchases_across_neighbors() {
        let cost = Cost::free().with_resource("wood", 2);
        let slots = [single(2, "wood")];
        let left_prices = prices(&[("wood", 1)]);
        let right_prices = prices(&[("wood", 2)]);
        let options = payment_options(
            &cost,
            10,
            &[],
            Market::new(&slots, &left_prices),
            Market::new(&slots, &right_prices),
        );
        // left 2 ($2), left 1 + right 1 ($1 + $2), right 2 ($4): none dominates
        // another on both sides.
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].left_cost(), 2);
        assert_eq!(options[0].right_cost(), 0);
        assert!(options.iter().any(|o| o.left_cost() == 1 && o.right_cost() == 2));
        assert!(options.iter().any(|o| o.left_cost() == 0 && o.right_cost() == 4));
    }

    #[test]
    fn local_production_kept_alongside_trades() {
        let cost = Cost::free().with_resource("wood", 1);
        let local = [single(1, "wood")];
        let left_slots = [single(1, "wood")];
        let left_prices = prices(&[("wood", 2)]);
        let options = payment_options(
            &cost,
            5,
            &local,
            Market::new(&left_slots, &left_prices),
            Market::closed(),
        );
        // Buying from the left is only worse on one side, so it survives.
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].trade_cost(), 0);
        assert_eq!(options[1].left_cost(), 2);
    }

    #[test]
    fn strictly_dominated_options_removed() {
        let cheap = {
            let mut option = PaymentOption::default();
            option.left_trade.add("wood", 1, 1);
            option.right_trade.add("clay", 1, 1);
            option
        };
        let expensive = {
            let mut option = PaymentOption::default();
            option.left_trade.add("wood", 1, 2);
            option.right_trade.add("clay", 1, 2);
            option
        };
        let cleaned = clean(vec![expensive, cheap.clone()]);
        assert_eq!(cleaned, vec![cheap]);
    }

    #[test]
    fn duplicate_compositions_collapsed() {
        let cost = Cost::free().with_resource("wood", 1);
        let local = [single(1, "wood"), single(1, "wood")];
        let raw = enumerate_payments(&cost, 0, &local, Market::closed(), Market::closed());
        assert_eq!(raw.len(), 2);
        let options = payment_options(&cost, 0, &local, Market::closed(), Market::closed());
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn caller_cost_is_untouched() {
        let cost = Cost::money_only(1).with_resource("wood", 1);
        let before = cost.clone();
        let _ = payment_options(&cost, 5, &[single(1, "wood")], Market::closed(), Market::closed());
        assert_eq!(cost, before);
    }
}
