//! Enumeration types shared by the rule book, the engine and the view layer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Seating
// ---------------------------------------------------------------------------

/// A side of the table, relative to a seated player.
///
/// Players sit in a circle ordered by seat number: the "left" neighbor has the
/// previous seat number and the "right" neighbor the next one, wrapping
/// around. Ages pass hands in one of these directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards the previous seat.
    Left,
    /// Towards the next seat.
    Right,
}

impl Direction {
    /// Both directions, left first.
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    /// The other side of the table.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// What a player does with the option picked this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Pay the building's cost and add it to the city.
    Build,
    /// Add the building without paying, using the once-per-age special ability.
    BuildFree,
    /// Discard the option for a fixed amount of money.
    Sell,
    /// Use the option to pay for the next special of the city.
    BuildSpecial,
}

impl ActionKind {
    /// Every action kind, in display order.
    pub const ALL: [Self; 4] = [Self::Build, Self::BuildFree, Self::Sell, Self::BuildSpecial];

    /// Whether this action adds the option's building to the player's city.
    pub const fn adds_building(self) -> bool {
        matches!(self, Self::Build | Self::BuildFree)
    }
}

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

/// Category of a building.
///
/// Fixed by the game design: adding a kind changes how scoring, trading and
/// dealing work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    /// Adds military power.
    Military,
    /// Gives victory points.
    Civilian,
    /// Produces raw resources.
    BasicResource,
    /// Produces manufactured resources.
    ComplexResource,
    /// Money, trade discounts and late-game bonuses.
    Economic,
    /// Gives science symbols.
    Scientific,
    /// Dealt separately in the last age; scores from neighbors' cities.
    Personality,
}

impl BuildingKind {
    /// Whether neighbors may buy the production of buildings of this kind.
    pub const fn is_tradeable(self) -> bool {
        matches!(self, Self::BasicResource | Self::ComplexResource)
    }
}

// ---------------------------------------------------------------------------
// Battles
// ---------------------------------------------------------------------------

/// Outcome of one battle against one neighbor at the end of an age.
///
/// Ties record nothing, so there is no "draw" variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    /// Strictly more military power than the neighbor.
    Victory,
    /// Strictly less military power than the neighbor.
    Defeat,
}

// ---------------------------------------------------------------------------
// Game lifecycle
// ---------------------------------------------------------------------------

/// Coarse lifecycle state of a game.
///
/// Transitions only go forward: `Joining -> Started -> Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Waiting for players; seats can still be claimed.
    Joining,
    /// Hands have been dealt and turns are being played.
    Started,
    /// The last age ended.
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_opposite_flips() {
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn only_resource_kinds_are_tradeable() {
        assert!(BuildingKind::BasicResource.is_tradeable());
        assert!(BuildingKind::ComplexResource.is_tradeable());
        assert!(!BuildingKind::Economic.is_tradeable());
        assert!(!BuildingKind::Personality.is_tradeable());
    }

    #[test]
    fn build_actions_add_buildings() {
        assert!(ActionKind::Build.adds_building());
        assert!(ActionKind::BuildFree.adds_building());
        assert!(!ActionKind::Sell.adds_building());
        assert!(!ActionKind::BuildSpecial.adds_building());
    }

    #[test]
    fn kinds_use_snake_case_on_the_wire() {
        let json = serde_json::to_string(&BuildingKind::BasicResource).ok();
        assert_eq!(json.as_deref(), Some("\"basic_resource\""));
        let parsed: Result<ActionKind, _> = serde_json::from_str("\"build_special\"");
        assert_eq!(parsed.ok(), Some(ActionKind::BuildSpecial));
    }
}
