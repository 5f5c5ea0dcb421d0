//! Error types for the `evolve-rules` crate.
//!
//! Rule data is validated once, when a [`RuleBook`](crate::RuleBook) is
//! loaded. Every cross reference (resource, science, building, city,
//! variant, age) must resolve, and every effect must be internally
//! consistent. Afterwards the rule book is read-only and its queries never
//! fail.

/// Errors raised while loading or validating rule data.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// Failed to read a rule file from disk.
    #[error("failed to read rule file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse YAML rule data.
    #[error("failed to parse rule data: {0}")]
    Yaml(#[from] serde_yml::Error),

    /// The rule data declares no ages.
    #[error("rule data declares no ages")]
    NoAges,

    /// Two entries of the same table share a name (or order, for ages).
    #[error("duplicate {table} entry: {name}")]
    Duplicate {
        /// Table holding the duplicate (e.g. `"building"`).
        table: &'static str,
        /// The repeated key.
        name: String,
    },

    /// A reference to another table does not resolve.
    #[error("{owner} refers to unknown {table} {name:?}")]
    UnknownReference {
        /// The entry holding the reference.
        owner: String,
        /// Table that should contain the target.
        table: &'static str,
        /// The missing name.
        name: String,
    },

    /// An effect sets fields that only make sense together, but not all of them.
    #[error("invalid effect on {owner}: {reason}")]
    InvalidEffect {
        /// The building or special carrying the effect.
        owner: String,
        /// What is inconsistent.
        reason: &'static str,
    },

    /// The specials of a city variant are not numbered `0, 1, 2, ...`.
    #[error("specials of {city} ({variant}) must be ordered from 0 without gaps; found order {found} at position {expected}")]
    SpecialOrder {
        /// City name.
        city: String,
        /// Variant name.
        variant: String,
        /// Order expected at this position.
        expected: u32,
        /// Order actually found.
        found: u32,
    },

    /// A build option requires no players at all.
    #[error("build option for {building} in {age} needs at least one player")]
    InvalidPlayerCount {
        /// Building of the option.
        building: String,
        /// Age of the option.
        age: String,
    },

    /// More build options were declared than identifiers are available.
    #[error("too many build options")]
    TooManyOptions,
}
