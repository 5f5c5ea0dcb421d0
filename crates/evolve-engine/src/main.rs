//! Engine binary for Evolve.
//!
//! Loads configuration and rules, seats bot players in a new game and plays
//! it to completion, logging every state transition and the final scores.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from the path given as first argument, or from
//!    `evolve-config.yaml` in the working directory
//! 2. Initialize structured logging (tracing)
//! 3. Load the rule book (configured file or bundled standard rules)
//! 4. Create the game registry
//! 5. Spawn bot players
//! 6. Play the match
//! 7. Log the result

mod bot;
mod error;
mod session;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use evolve_core::{EngineConfig, GameRegistry};
use evolve_core::config::LoggingConfig;
use evolve_rules::RuleBook;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG: &str = "evolve-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the match itself fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    let (config, from_file) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!("evolve-engine starting");
    info!(
        path = %config_path.display(),
        from_file,
        seed = ?config.game.seed,
        bots = config.simulation.bots,
        max_turns = config.simulation.max_turns,
        "Configuration loaded"
    );

    // 3. Load the rule book.
    let rules = match &config.rules.path {
        Some(path) => {
            info!(path = %path.display(), "Loading rule book from file");
            RuleBook::from_file(path)?
        }
        None => RuleBook::standard()?,
    };

    // 4. Create the registry.
    let registry = GameRegistry::new(Arc::new(rules), config.game.clone());

    // 5. Spawn bots. Seeded runs derive the bot generator from the game seed.
    let mut rng = config.game.seed.map_or_else(SmallRng::from_os_rng, |seed| {
        SmallRng::seed_from_u64(seed.rotate_left(32))
    });
    let bots = bot::spawn_bots(config.simulation.bots, &mut rng);
    info!(
        bots = ?bots.iter().map(|bot| bot.name.as_str()).collect::<Vec<_>>(),
        "Bots spawned"
    );

    // 6. Play.
    let outcome = session::run_session(&registry, &bots, config.simulation.max_turns, &mut rng)?;

    // 7. Log results.
    info!(
        game_id = %outcome.game,
        turns = outcome.turns,
        finished = outcome.finished,
        players = outcome.scores.len(),
        "evolve-engine shutdown complete"
    );
    Ok(())
}

/// Load the engine configuration, falling back to defaults when the file
/// does not exist. Returns whether a file was read.
fn load_config(path: &Path) -> Result<(EngineConfig, bool), EngineError> {
    if path.exists() {
        Ok((EngineConfig::from_file(path)?, true))
    } else {
        let mut config = EngineConfig::default();
        config.game.apply_env_overrides()?;
        Ok((config, false))
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| EngineError::Logging {
            message: format!("invalid log level {:?}: {e}", logging.level),
        })?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| EngineError::Logging {
        message: format!("{e}"),
    })
}
