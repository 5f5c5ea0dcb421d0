//! Ages: the phases of a game.

use evolve_types::Direction;
use serde::{Deserialize, Serialize};

/// Default score for a military defeat.
const fn default_defeat_score() -> i32 {
    -1
}

/// One phase of a game, with its own option pool and hand direction.
///
/// Ages are played in increasing `order`. At the end of each age every
/// player fights both neighbors; the age decides what a victory and a defeat
/// are worth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Age {
    /// Display name, unique within a rule book.
    pub name: String,
    /// Position in the play sequence (lower first), unique.
    pub order: u32,
    /// Direction hands travel at the end of each turn.
    pub direction: Direction,
    /// Score per military victory in this age.
    pub victory_score: i32,
    /// Score per military defeat in this age (usually negative).
    #[serde(default = "default_defeat_score")]
    pub defeat_score: i32,
    /// Turn limit override; the engine configuration applies when absent.
    #[serde(default)]
    pub turns: Option<u32>,
}

impl Age {
    /// Number of turns played in this age, given the configured default.
    pub fn turn_limit(&self, default: u32) -> u32 {
        self.turns.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defeat_defaults_to_minus_one() {
        let age: Result<Age, _> =
            serde_yml::from_str("{name: I, order: 1, direction: left, victory_score: 1}");
        assert!(age.is_ok());
        let age = age.ok();
        assert_eq!(age.as_ref().map(|a| a.defeat_score), Some(-1));
        assert_eq!(age.map(|a| a.turn_limit(6)), Some(6));
    }

    #[test]
    fn turn_limit_override() {
        let age = Age {
            name: "Short".to_owned(),
            order: 1,
            direction: Direction::Right,
            victory_score: 3,
            defeat_score: -1,
            turns: Some(2),
        };
        assert_eq!(age.turn_limit(6), 2);
    }
}
