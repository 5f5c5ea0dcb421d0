//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of engine startup and of the
//! bot match, giving `main` a single error type to propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: evolve_core::ConfigError,
    },

    /// The rule book could not be loaded or failed validation.
    #[error("rules error: {source}")]
    Rules {
        /// The underlying rules error.
        #[from]
        source: evolve_rules::RulesError,
    },

    /// The game rejected an operation.
    #[error("game error: {source}")]
    Game {
        /// The underlying game error.
        #[from]
        source: evolve_core::GameError,
    },

    /// The game registry failed.
    #[error("registry error: {source}")]
    Registry {
        /// The underlying registry error.
        #[from]
        source: evolve_core::RegistryError,
    },

    /// Logging could not be initialized.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },

    /// A bot had no legal action although it had to play.
    #[error("bot {bot} has no legal action")]
    Stuck {
        /// Name of the bot.
        bot: String,
    },
}
