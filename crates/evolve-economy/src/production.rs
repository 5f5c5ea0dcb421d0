//! Production slots and neighbor markets.
//!
//! A [`ProductionSlot`] is one source of resources per turn: a city's base
//! resource, a resource building, or a special. Some slots offer a choice
//! (e.g. "wood or clay"); only one alternative of a slot can be used for a
//! single payment. A [`Market`] pairs a neighbor's tradeable slots with the
//! price the buyer pays per unit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EconomyError;

/// Prices used when a side of the table has nothing to sell.
static NO_PRICES: BTreeMap<String, u32> = BTreeMap::new();

/// A fixed amount of one resource.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Yield {
    /// Units produced.
    pub amount: u32,
    /// Resource name.
    pub resource: String,
}

impl Yield {
    /// Build a yield of `amount` units of `resource`.
    pub fn new(amount: u32, resource: impl Into<String>) -> Self {
        Self {
            amount,
            resource: resource.into(),
        }
    }
}

/// One production source, usable once per payment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductionSlot {
    /// Always produces the same resource.
    Single(Yield),
    /// Produces exactly one of the listed alternatives, chosen at payment time.
    OneOf(Vec<Yield>),
}

impl ProductionSlot {
    /// Build a slot from a list of alternatives.
    ///
    /// One alternative yields [`ProductionSlot::Single`], several yield
    /// [`ProductionSlot::OneOf`].
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::EmptySlot`] for an empty list and
    /// [`EconomyError::ZeroYield`] if any alternative produces nothing.
    pub fn from_yields(mut yields: Vec<Yield>) -> Result<Self, EconomyError> {
        if let Some(zero) = yields.iter().find(|y| y.amount == 0) {
            return Err(EconomyError::ZeroYield {
                resource: zero.resource.clone(),
            });
        }
        match yields.len() {
            0 => Err(EconomyError::EmptySlot),
            1 => yields.pop().map(Self::Single).ok_or(EconomyError::EmptySlot),
            _ => Ok(Self::OneOf(yields)),
        }
    }

    /// The mutually exclusive alternatives of this slot.
    pub fn alternatives(&self) -> &[Yield] {
        match self {
            Self::Single(single) => core::slice::from_ref(single),
            Self::OneOf(choices) => choices,
        }
    }

    /// Whether any alternative produces `resource`.
    pub fn produces(&self, resource: &str) -> bool {
        self.alternatives().iter().any(|y| y.resource == resource)
    }
}

impl core::fmt::Display for ProductionSlot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let parts: Vec<String> = self
            .alternatives()
            .iter()
            .map(|y| {
                if y.amount == 1 {
                    y.resource.clone()
                } else {
                    format!("{}\u{d7}{}", y.amount, y.resource)
                }
            })
            .collect();
        write!(f, "{}", parts.join("/"))
    }
}

/// What one neighbor offers for sale, and at which unit prices.
///
/// Resources without a price (or priced at zero) cannot be bought.
#[derive(Debug, Clone, Copy)]
pub struct Market<'a> {
    /// The neighbor's tradeable production.
    pub slots: &'a [ProductionSlot],
    /// Price per unit, per resource name.
    pub prices: &'a BTreeMap<String, u32>,
}

impl<'a> Market<'a> {
    /// A market selling `slots` at `prices`.
    pub const fn new(slots: &'a [ProductionSlot], prices: &'a BTreeMap<String, u32>) -> Self {
        Self { slots, prices }
    }

    /// A market with nothing for sale.
    pub fn closed() -> Market<'static> {
        Market {
            slots: &[],
            prices: &NO_PRICES,
        }
    }

    /// Unit price of `resource`, if it can be bought at all.
    pub fn unit_price(&self, resource: &str) -> Option<u32> {
        self.prices.get(resource).copied().filter(|price| *price > 0)
    }

    /// The same market without its first slot.
    pub(crate) const fn rest(self, rest: &'a [ProductionSlot]) -> Self {
        Self {
            slots: rest,
            prices: self.prices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_alternative_builds_single_slot() {
        let slot = ProductionSlot::from_yields(vec![Yield::new(2, "wood")]);
        assert_eq!(slot.ok(), Some(ProductionSlot::Single(Yield::new(2, "wood"))));
    }

    #[test]
    fn several_alternatives_build_choice() {
        let slot = ProductionSlot::from_yields(vec![Yield::new(1, "wood"), Yield::new(1, "clay")]);
        assert!(slot.is_ok());
        let slot = slot.ok();
        assert_eq!(slot.as_ref().map(|s| s.alternatives().len()), Some(2));
        assert_eq!(slot.map(|s| s.to_string()).as_deref(), Some("wood/clay"));
    }

    #[test]
    fn empty_and_zero_slots_rejected() {
        assert!(matches!(
            ProductionSlot::from_yields(Vec::new()),
            Err(EconomyError::EmptySlot)
        ));
        assert!(matches!(
            ProductionSlot::from_yields(vec![Yield::new(0, "ore")]),
            Err(EconomyError::ZeroYield { .. })
        ));
    }

    #[test]
    fn zero_price_is_not_for_sale() {
        let prices: BTreeMap<String, u32> =
            [("wood".to_owned(), 0), ("stone".to_owned(), 2)].into_iter().collect();
        let market = Market::new(&[], &prices);
        assert_eq!(market.unit_price("wood"), None);
        assert_eq!(market.unit_price("stone"), Some(2));
        assert_eq!(market.unit_price("ore"), None);
    }

    #[test]
    fn closed_market_sells_nothing() {
        let market = Market::closed();
        assert!(market.slots.is_empty());
        assert_eq!(market.unit_price("wood"), None);
    }
}
