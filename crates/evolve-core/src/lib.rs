//! Game state machine, player actions and scoring for the Evolve engine.
//!
//! A [`Game`] seats players in cities, deals build options per age, records
//! one action per player per turn and resolves the turn once everyone has
//! chosen. Rule questions about one player and their neighbors go through a
//! [`Seat`].
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `evolve-config.yaml` into
//!   strongly-typed structs.
//! - [`error`] -- [`GameError`]: rejected requests and invariant violations.
//! - [`game`] -- The game lifecycle: join, start, deal, play, turn and age
//!   resolution.
//! - [`player`] -- Per-player state and the [`PlayRequest`] a player submits.
//! - [`registry`] -- [`GameRegistry`], one lock per running game.
//! - [`score`] -- End-of-game [`Score`] per category.
//! - [`seat`] -- Rule queries over a player and both neighbors.

pub mod config;
pub mod error;
pub mod game;
pub mod player;
pub mod registry;
pub mod score;
pub mod seat;

pub use config::{ConfigError, EngineConfig, GameConfig};
pub use error::GameError;
pub use game::{FinalScore, Game, ShuffleReport};
pub use player::{BattleRecord, PendingAction, PlayRequest, Player};
pub use registry::{GameRegistry, GameSummary, RegistryError};
pub use score::{Score, science_score};
pub use seat::Seat;
