//! Payment composition: [`ResourceSet`] and [`PaymentOption`].

use std::collections::BTreeMap;

use evolve_types::Direction;
use serde::{Deserialize, Serialize};

/// Units acquired of one resource and the money spent acquiring them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Acquired {
    /// Units of the resource.
    pub amount: u32,
    /// Money paid for them (zero for local production).
    pub cost: u32,
}

/// Resources used by one part of a payment, keyed by resource name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceSet {
    entries: BTreeMap<String, Acquired>,
}

impl ResourceSet {
    /// An empty set.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Record `amount` more units of `resource` bought for `cost`.
    pub fn add(&mut self, resource: &str, amount: u32, cost: u32) {
        let entry = self.entries.entry(resource.to_owned()).or_default();
        entry.amount = entry.amount.saturating_add(amount);
        entry.cost = entry.cost.saturating_add(cost);
    }

    /// Units and cost recorded for `resource`.
    pub fn get(&self, resource: &str) -> Acquired {
        self.entries.get(resource).copied().unwrap_or_default()
    }

    /// Units recorded for `resource`.
    pub fn amount(&self, resource: &str) -> u32 {
        self.get(resource).amount
    }

    /// Whether at least `amount` units of `resource` are recorded.
    pub fn contains(&self, resource: &str, amount: u32) -> bool {
        self.entries
            .get(resource)
            .is_some_and(|acquired| acquired.amount >= amount)
    }

    /// Total money spent across all resources.
    pub fn cost(&self) -> u32 {
        self.entries
            .values()
            .fold(0_u32, |total, acquired| total.saturating_add(acquired.cost))
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over recorded resources in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Acquired)> {
        self.entries.iter().map(|(name, acquired)| (name.as_str(), *acquired))
    }
}

impl core::fmt::Display for ResourceSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(name, acquired)| format!("{}\u{d7}{name}", acquired.amount))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// One complete way to pay a cost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentOption {
    /// Money paid directly for the money component of the cost.
    pub money: u32,
    /// Resources bought from the left neighbor.
    pub left_trade: ResourceSet,
    /// Resources bought from the right neighbor.
    pub right_trade: ResourceSet,
    /// Resources taken from the buyer's own production.
    pub local: ResourceSet,
}

impl PaymentOption {
    /// Money paid to the left neighbor.
    pub fn left_cost(&self) -> u32 {
        self.left_trade.cost()
    }

    /// Money paid to the right neighbor.
    pub fn right_cost(&self) -> u32 {
        self.right_trade.cost()
    }

    /// Money paid to the neighbor on `direction`.
    pub fn trade_cost_towards(&self, direction: Direction) -> u32 {
        self.trade(direction).cost()
    }

    /// Money paid to both neighbors together.
    pub fn trade_cost(&self) -> u32 {
        self.left_cost().saturating_add(self.right_cost())
    }

    /// Everything the buyer spends: direct money plus trades.
    pub fn total_cost(&self) -> u32 {
        self.money.saturating_add(self.trade_cost())
    }

    /// Resources bought from the neighbor on `direction`.
    pub const fn trade(&self, direction: Direction) -> &ResourceSet {
        match direction {
            Direction::Left => &self.left_trade,
            Direction::Right => &self.right_trade,
        }
    }

    /// Mutable access to the trade with the neighbor on `direction`.
    pub const fn trade_mut(&mut self, direction: Direction) -> &mut ResourceSet {
        match direction {
            Direction::Left => &mut self.left_trade,
            Direction::Right => &mut self.right_trade,
        }
    }

    /// Whether this option pays exactly the declared trade amounts.
    pub fn matches_trades(&self, trade_left: u32, trade_right: u32) -> bool {
        self.left_cost() == trade_left && self.right_cost() == trade_right
    }

    /// Whether this option is strictly cheaper on both sides of the table.
    ///
    /// A strict partial order: an option that is cheaper on one side only
    /// neither dominates nor is dominated.
    pub fn strictly_dominates(&self, other: &Self) -> bool {
        self.left_cost() < other.left_cost() && self.right_cost() < other.right_cost()
    }
}

impl core::fmt::Display for PaymentOption {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut parts = Vec::new();
        if self.money > 0 {
            parts.push(format!("${}", self.money));
        }
        if !self.local.is_empty() {
            parts.push(format!("own {}", self.local));
        }
        if !self.left_trade.is_empty() {
            parts.push(format!("<- {} (${})", self.left_trade, self.left_cost()));
        }
        if !self.right_trade.is_empty() {
            parts.push(format!("{} (${}) ->", self.right_trade, self.right_cost()));
        }
        if parts.is_empty() {
            write!(f, "free")
        } else {
            write!(f, "{}", parts.join(" + "))
        }
    }
}
