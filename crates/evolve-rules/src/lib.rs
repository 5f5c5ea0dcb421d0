//! Rule book for the Evolve board game engine.
//!
//! Rule data is loaded from YAML and never changes during play: resources,
//! sciences, city variants, ages, cities with their specials, buildings with
//! their effects, and the build options dealt each age.
//!
//! # Modules
//!
//! - [`age`] -- [`Age`]: play order, hand direction, battle scores.
//! - [`building`] -- [`Building`] and the [`BuildOption`]s that deal it.
//! - [`city`] -- [`City`] and its ordered [`CitySpecial`]s.
//! - [`effect`] -- [`Effect`] validation and evaluation against a
//!   [`Neighborhood`].
//! - [`error`] -- [`RulesError`] for loading and validation failures.
//! - [`rulebook`] -- [`RuleBook`]: the validated, indexed rule data, and the
//!   bundled standard set.

pub mod age;
pub mod building;
pub mod city;
pub mod effect;
pub mod error;
pub mod rulebook;

// Re-export primary types at crate root.
pub use age::Age;
pub use building::{BuildOption, Building};
pub use city::{City, CitySpecial};
pub use effect::{Effect, Neighborhood, Tally};
pub use error::RulesError;
pub use rulebook::{OptionEntry, ResourceDef, RuleBook, RuleData};
