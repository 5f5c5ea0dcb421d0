//! Configuration loading and typed config structures for the Evolve engine.
//!
//! The configuration lives in `evolve-config.yaml`. This module defines
//! strongly-typed structs that mirror the YAML structure and a loader that
//! reads the file. Every field has a default, so an empty file (or no file)
//! yields the standard game.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override holds an unusable value.
    #[error("invalid value for {variable}: {reason}")]
    InvalidOverride {
        /// The environment variable.
        variable: &'static str,
        /// The rejected value and why.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Environment variable overriding [`GameConfig::seed`].
pub const SEED_VARIABLE: &str = "EVOLVE_SEED";

/// Top-level engine configuration.
///
/// Mirrors the structure of `evolve-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Game constants (money, hand size, turns, player limits).
    #[serde(default)]
    pub game: GameConfig,

    /// Where the rule book comes from.
    #[serde(default)]
    pub rules: RulesConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Bot simulation parameters for the engine binary.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `EVOLVE_SEED` overrides `game.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidOverride`] if `EVOLVE_SEED` is not a number.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.game.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Game constants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Money each player starts with.
    #[serde(default = "default_initial_money")]
    pub initial_money: u32,

    /// Options dealt to each player at the start of an age.
    #[serde(default = "default_initial_options")]
    pub initial_options: u32,

    /// Turns per age, unless the age sets its own limit.
    #[serde(default = "default_turns_per_age")]
    pub turns_per_age: u32,

    /// Money gained by selling an option.
    #[serde(default = "default_sell_value")]
    pub sell_value: u32,

    /// Unit price of trading with a neighbor without any discount.
    #[serde(default = "default_trade_cost")]
    pub default_trade_cost: u32,

    /// Players needed to start a game.
    #[serde(default = "default_min_players")]
    pub min_players: u32,

    /// Seats available in a game.
    #[serde(default = "default_max_players")]
    pub max_players: u32,

    /// Random seed for reproducible games; drawn from the OS when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Apply environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if `EVOLVE_SEED` is set but
    /// is not an unsigned integer.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = std::env::var(SEED_VARIABLE) {
            let seed = value
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidOverride {
                    variable: SEED_VARIABLE,
                    reason: format!("{value:?}: {e}"),
                })?;
            self.seed = Some(seed);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_money: default_initial_money(),
            initial_options: default_initial_options(),
            turns_per_age: default_turns_per_age(),
            sell_value: default_sell_value(),
            default_trade_cost: default_trade_cost(),
            min_players: default_min_players(),
            max_players: default_max_players(),
            seed: None,
        }
    }
}

/// Rule book source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RulesConfig {
    /// Path of a YAML rule book; the bundled standard rules when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Bot simulation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Number of bot players seated.
    #[serde(default = "default_bots")]
    pub bots: u32,

    /// Safety limit on turns played before giving up (0 = unlimited).
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            bots: default_bots(),
            max_turns: default_max_turns(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_initial_money() -> u32 {
    3
}

const fn default_initial_options() -> u32 {
    7
}

const fn default_turns_per_age() -> u32 {
    6
}

const fn default_sell_value() -> u32 {
    3
}

const fn default_trade_cost() -> u32 {
    2
}

const fn default_min_players() -> u32 {
    3
}

const fn default_max_players() -> u32 {
    7
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_bots() -> u32 {
    3
}

const fn default_max_turns() -> u32 {
    100
}
