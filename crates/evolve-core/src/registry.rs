//! Registry of running games.
//!
//! Each game sits behind its own [`Mutex`]: every mutating call runs under
//! that lock, so a game has a single writer at a time while distinct games
//! proceed independently. The map itself is behind a [`RwLock`] taken only
//! to add, find or remove games.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use evolve_rules::RuleBook;
use evolve_types::{GameId, GameStatus};
use tracing::{info, warn};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::Game;

/// Errors raised by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No game with this id is registered.
    #[error("unknown game {0}")]
    UnknownGame(GameId),

    /// A lock was poisoned by a panicking holder.
    #[error("lock poisoned: {0}")]
    Poisoned(String),

    /// The game rejected the operation.
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Summary of a registered game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    /// Game identifier.
    pub id: GameId,
    /// Lifecycle state.
    pub status: GameStatus,
    /// Seated players.
    pub players: usize,
    /// Current age.
    pub age: String,
    /// Turn within the age.
    pub turn: u32,
}

/// Every game hosted by this process.
#[derive(Debug)]
pub struct GameRegistry {
    rules: Arc<RuleBook>,
    config: GameConfig,
    /// Games created so far; offsets the configured seed per game.
    created: AtomicU64,
    games: RwLock<BTreeMap<GameId, Arc<Mutex<Game>>>>,
}

impl GameRegistry {
    /// An empty registry whose games play by `rules` and `config`.
    pub const fn new(rules: Arc<RuleBook>, config: GameConfig) -> Self {
        Self {
            rules,
            config,
            created: AtomicU64::new(0),
            games: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create and register a new game.
    ///
    /// With a configured seed, the n-th game is seeded with `seed + n` so
    /// every game of a seeded run is reproducible yet distinct.
    pub fn create(&self) -> Result<GameId, RegistryError> {
        let index = self.created.fetch_add(1, Ordering::Relaxed);
        let config = GameConfig {
            seed: self.config.seed.map(|seed| seed.wrapping_add(index)),
            ..self.config.clone()
        };
        let game = Game::new(Arc::clone(&self.rules), config)?;
        let id = game.id();
        self.games
            .write()
            .map_err(|e| poisoned(&e))?
            .insert(id, Arc::new(Mutex::new(game)));
        info!(game_id = %id, "Game registered");
        Ok(id)
    }

    /// Shared handle on a game.
    pub fn get(&self, id: GameId) -> Result<Arc<Mutex<Game>>, RegistryError> {
        self.games
            .read()
            .map_err(|e| poisoned(&e))?
            .get(&id)
            .cloned()
            .ok_or(RegistryError::UnknownGame(id))
    }

    /// Run `operation` on a game under its lock.
    ///
    /// The registry map is not locked while `operation` runs.
    pub fn with_game<T>(
        &self,
        id: GameId,
        operation: impl FnOnce(&mut Game) -> Result<T, GameError>,
    ) -> Result<T, RegistryError> {
        let handle = self.get(id)?;
        let mut game = handle.lock().map_err(|e| poisoned(&e))?;
        Ok(operation(&mut game)?)
    }

    /// Summaries of every registered game, ordered by id.
    pub fn list(&self) -> Result<Vec<GameSummary>, RegistryError> {
        let handles: Vec<Arc<Mutex<Game>>> = self
            .games
            .read()
            .map_err(|e| poisoned(&e))?
            .values()
            .cloned()
            .collect();
        handles
            .iter()
            .map(|handle| {
                let game = handle.lock().map_err(|e| poisoned(&e))?;
                Ok(GameSummary {
                    id: game.id(),
                    status: game.status(),
                    players: game.players().len(),
                    age: game.age_name().to_owned(),
                    turn: game.turn(),
                })
            })
            .collect()
    }

    /// Unregister a game, returning its handle.
    pub fn remove(&self, id: GameId) -> Result<Arc<Mutex<Game>>, RegistryError> {
        let removed = self
            .games
            .write()
            .map_err(|e| poisoned(&e))?
            .remove(&id)
            .ok_or(RegistryError::UnknownGame(id))?;
        info!(game_id = %id, "Game removed");
        Ok(removed)
    }

    /// Number of registered games.
    pub fn len(&self) -> Result<usize, RegistryError> {
        Ok(self.games.read().map_err(|e| poisoned(&e))?.len())
    }

    /// Whether no game is registered.
    pub fn is_empty(&self) -> Result<bool, RegistryError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned(error: &impl std::fmt::Display) -> RegistryError {
    warn!(%error, "Registry lock poisoned");
    RegistryError::Poisoned(error.to_string())
}
