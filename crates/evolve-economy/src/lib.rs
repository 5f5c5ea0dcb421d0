//! Cost model and payment solver for the Evolve board game engine.
//!
//! Buying a building or a special means covering its [`Cost`]: money is paid
//! directly, resources come from the buyer's own production or are bought
//! from the two neighbors at their posted prices.
//!
//! # Modules
//!
//! - [`cost`] -- The immutable [`Cost`] value type.
//! - [`production`] -- [`ProductionSlot`] (single or alternative yields) and
//!   neighbor [`Market`]s.
//! - [`payment`] -- [`PaymentOption`] and its [`ResourceSet`] parts.
//! - [`solver`] -- Enumeration of every way to pay and dominance cleaning.
//! - [`error`] -- [`EconomyError`] for malformed production data.
//!
//! # Usage
//!
//! ```
//! use evolve_economy::{Cost, Market, ProductionSlot, Yield, payment_options};
//!
//! let cost = Cost::free().with_resource("wood", 2);
//! let local = [ProductionSlot::Single(Yield::new(3, "wood"))];
//!
//! let options = payment_options(&cost, 5, &local, Market::closed(), Market::closed());
//! assert_eq!(options.len(), 1);
//! assert_eq!(options[0].local.amount("wood"), 2);
//! ```

pub mod cost;
pub mod error;
pub mod payment;
pub mod production;
pub mod solver;

// Re-export primary types at crate root.
pub use cost::Cost;
pub use error::EconomyError;
pub use payment::{Acquired, PaymentOption, ResourceSet};
pub use production::{Market, ProductionSlot, Yield};
pub use solver::{clean, enumerate_payments, payment_options};
