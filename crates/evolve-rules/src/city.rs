//! Cities and their specials.

use evolve_economy::Cost;
use serde::{Deserialize, Serialize};

use crate::effect::Effect;

/// A city a player builds in. It produces one unit of its resource per turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct City {
    /// Unique name.
    pub name: String,
    /// Resource produced by the city itself.
    pub resource: String,
}

/// An extra effect buildable in one city variant.
///
/// Specials of a city variant are built strictly in `order`, starting at 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CitySpecial {
    /// City the special belongs to.
    pub city: String,
    /// Variant of the city.
    pub variant: String,
    /// Zero-based build position.
    pub order: u32,
    /// Price of building it.
    #[serde(default)]
    pub cost: Cost,
    /// What it provides once built.
    #[serde(default)]
    pub effect: Effect,
}

impl core::fmt::Display for CitySpecial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}({}) / {}",
            self.city,
            self.variant,
            self.order.saturating_add(1)
        )
    }
}
