//! Error types for the `evolve-economy` crate.
//!
//! The solver itself never fails: an unpayable cost is an empty list of
//! payment options. Errors only arise when building production slots from
//! malformed rule data.

/// Errors raised while constructing economy values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EconomyError {
    /// A production slot was built without any alternative.
    #[error("production slot has no alternatives")]
    EmptySlot,

    /// A production alternative yields zero units.
    #[error("production of {resource} yields zero units")]
    ZeroYield {
        /// The resource with the empty yield.
        resource: String,
    },
}
