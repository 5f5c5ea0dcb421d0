//! Error types for the `evolve-core` crate.
//!
//! Two families share [`GameError`]:
//!
//! - precondition failures (joining twice, playing an option not held,
//!   declaring trades no payment matches, ...) are returned to the caller
//!   and leave the game untouched;
//! - invariant violations ([`GameError::Invariant`],
//!   [`GameError::NotEnoughOptions`]) mean the game state or the rule data
//!   is inconsistent. They abort the operation, are logged with
//!   `tracing::error!` and are never retried.

use evolve_types::{BuildOptionId, GameStatus, UserId};
use tracing::error;

/// Errors raised by game operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The operation needs the game in another lifecycle state.
    #[error("game is {actual:?}, expected {expected:?}")]
    WrongStatus {
        /// State the operation requires.
        expected: GameStatus,
        /// State the game is in.
        actual: GameStatus,
    },

    /// The user already has a seat in this game.
    #[error("user {0} already joined")]
    AlreadySeated(UserId),

    /// Every seat is taken.
    #[error("game is full ({max} players)")]
    GameFull {
        /// Seat limit.
        max: u32,
    },

    /// Every city is already claimed, or the rule book has no variants.
    #[error("no city left to assign")]
    NoCityAvailable,

    /// Too few players to start.
    #[error("{seated} players seated, {needed} needed")]
    NotEnoughPlayers {
        /// Players seated.
        seated: u32,
        /// Minimum required.
        needed: u32,
    },

    /// The user has no seat in this game.
    #[error("user {0} is not playing this game")]
    UnknownPlayer(UserId),

    /// The player already chose an action this turn.
    #[error("user {0} already chose an action this turn")]
    ActionPending(UserId),

    /// The option is not in the player's hand.
    #[error("option {0} is not in hand")]
    OptionNotHeld(BuildOptionId),

    /// The option's building is already part of the player's city.
    #[error("{building} is already built")]
    AlreadyBuilt {
        /// Building name.
        building: String,
    },

    /// The free-building ability is missing or already used this age.
    #[error("free building is not available")]
    FreeBuildUnavailable,

    /// Every special of the city is built.
    #[error("no special left to build")]
    NoSpecialLeft,

    /// No payment option matches the declared trade amounts.
    #[error("no payment pays ${left} left and ${right} right")]
    NoMatchingPayment {
        /// Declared payment to the left neighbor.
        left: u32,
        /// Declared payment to the right neighbor.
        right: u32,
    },

    /// The option is still in a player's hand.
    #[error("option {0} is still in a hand")]
    OptionInHand(BuildOptionId),

    /// The option is on the discard pile already.
    #[error("option {0} is already discarded")]
    AlreadyDiscarded(BuildOptionId),

    /// The option id is not part of the rule book.
    #[error("unknown option {0}")]
    UnknownOption(BuildOptionId),

    /// Fewer options are eligible than the hands need.
    #[error("age {age} has {available} options, {needed} needed")]
    NotEnoughOptions {
        /// Age being dealt.
        age: String,
        /// Options eligible (after personality selection).
        available: usize,
        /// Options the hands need.
        needed: usize,
    },

    /// Game state or rule data is inconsistent.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl GameError {
    /// Whether this error reports broken state rather than a rejected request.
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::Invariant(_) | Self::NotEnoughOptions { .. })
    }

    /// Build an [`GameError::Invariant`], logging it.
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(%message, "Game invariant violated");
        Self::Invariant(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(GameError::Invariant("x".to_owned()).is_invariant_violation());
        assert!(
            GameError::NotEnoughOptions {
                age: "I".to_owned(),
                available: 3,
                needed: 21,
            }
            .is_invariant_violation()
        );
        assert!(!GameError::NoSpecialLeft.is_invariant_violation());
        assert!(!GameError::UnknownPlayer(UserId::new()).is_invariant_violation());
    }
}
