//! Per-player game state.
//!
//! A [`Player`] owns money, buildings, the current hand of options and the
//! choice made this turn. The choice is only recorded by
//! [`Game::play`](crate::Game::play); its effects are applied when the turn
//! resolves.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use evolve_rules::{RuleBook, Tally};
use evolve_types::{ActionKind, BattleOutcome, BuildOptionId, Direction, PlayerId, UserId};
use serde::{Deserialize, Serialize};

/// An action a player asks to perform this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRequest {
    /// What to do with the option.
    pub action: ActionKind,
    /// The option played, from the player's hand.
    pub option: BuildOptionId,
    /// Money paid to the left neighbor.
    pub trade_left: u32,
    /// Money paid to the right neighbor.
    pub trade_right: u32,
}

impl PlayRequest {
    /// Sell `option`.
    pub const fn sell(option: BuildOptionId) -> Self {
        Self {
            action: ActionKind::Sell,
            option,
            trade_left: 0,
            trade_right: 0,
        }
    }
}

/// A recorded choice waiting for the turn to resolve.
pub type PendingAction = PlayRequest;

/// Outcome of one battle fought at the end of an age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    /// Age the battle was fought in.
    pub age: String,
    /// Neighbor fought.
    pub direction: Direction,
    /// Result for this player.
    pub result: BattleOutcome,
    /// When it was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// One seat of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Identifier of the seat.
    pub id: PlayerId,
    /// The user playing.
    pub user: UserId,
    /// Position at the table; neighbors are the previous and next seats.
    pub seat: u32,
    /// City assigned at join.
    pub city: String,
    /// City variant assigned at join.
    pub variant: String,
    /// Money owned.
    pub money: u32,
    /// Specials with a lower order than this are built. Never decreases.
    pub specials_built: u32,
    /// Buildings in the city, in build order.
    pub buildings: Vec<String>,
    /// Ages in which the free-building ability was used.
    pub free_build_ages: BTreeSet<String>,
    /// Options held this turn.
    pub hand: Vec<BuildOptionId>,
    /// Choice recorded this turn.
    pub pending: Option<PendingAction>,
    /// Battles fought so far.
    pub battles: Vec<BattleRecord>,
}

impl Player {
    /// A fresh seat with `money` and nothing built.
    pub fn new(user: UserId, seat: u32, city: String, variant: String, money: u32) -> Self {
        Self {
            id: PlayerId::new(),
            user,
            seat,
            city,
            variant,
            money,
            specials_built: 0,
            buildings: Vec::new(),
            free_build_ages: BTreeSet::new(),
            hand: Vec::new(),
            pending: None,
            battles: Vec::new(),
        }
    }

    /// Whether `building` is part of the city.
    pub fn owns(&self, building: &str) -> bool {
        self.buildings.iter().any(|owned| owned == building)
    }

    /// Whether `option` is in hand.
    pub fn holds(&self, option: BuildOptionId) -> bool {
        self.hand.contains(&option)
    }

    /// Whether an action was chosen this turn.
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Clear the choice of this turn.
    pub const fn reset_action(&mut self) {
        self.pending = None;
    }

    /// Remove `option` from the hand, returning whether it was held.
    pub fn take_from_hand(&mut self, option: BuildOptionId) -> bool {
        let before = self.hand.len();
        self.hand.retain(|held| *held != option);
        self.hand.len() < before
    }

    /// Battles lost so far.
    pub fn defeats(&self) -> u32 {
        let lost = self
            .battles
            .iter()
            .filter(|battle| battle.result == BattleOutcome::Defeat)
            .count();
        u32::try_from(lost).unwrap_or(u32::MAX)
    }

    /// Counters effects are evaluated against.
    pub fn tally(&self, rules: &RuleBook) -> Tally {
        let mut tally = Tally::new();
        for building in self.buildings.iter().filter_map(|name| rules.building(name)) {
            tally.add_building(building.kind);
        }
        tally.specials = self.specials_built;
        tally.defeats = self.defeats();
        tally
    }
}
