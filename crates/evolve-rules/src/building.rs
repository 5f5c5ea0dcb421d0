//! Buildings and the build options that deal them.

use evolve_economy::Cost;
use evolve_types::{BuildOptionId, BuildingKind};
use serde::{Deserialize, Serialize};

use crate::effect::Effect;

/// Something a player can add to their city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Building {
    /// Unique name.
    pub name: String,
    /// Category, used for trading, scoring and dealing.
    pub kind: BuildingKind,
    /// Price of building it.
    #[serde(default)]
    pub cost: Cost,
    /// What it provides once built.
    #[serde(default)]
    pub effect: Effect,
    /// A building that, when already owned, makes this one free.
    #[serde(default)]
    pub free_having: Option<String>,
}

impl Building {
    /// Whether this building is free for a player owning `owned`.
    pub fn is_chained_from<'a>(&self, mut owned: impl Iterator<Item = &'a str>) -> bool {
        self.free_having
            .as_deref()
            .is_some_and(|required| owned.any(|name| name == required))
    }
}

/// A card that lets its holder build one specific building in one age.
///
/// An option is only shuffled into games with at least `players_needed`
/// players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOption {
    /// Identifier assigned when the rule book is loaded.
    pub id: BuildOptionId,
    /// Name of the building it deals.
    pub building: String,
    /// Name of the age it is dealt in.
    pub age: String,
    /// Minimum number of players for the option to be in play.
    pub players_needed: u32,
}

impl BuildOption {
    /// Whether the option is in play for `age` with `players` seated.
    pub fn is_eligible(&self, age: &str, players: u32) -> bool {
        self.age == age && self.players_needed <= players
    }
}

impl core::fmt::Display for BuildOption {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} (+{})", self.building, self.players_needed)
    }
}
