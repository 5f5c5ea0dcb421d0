//! Type-safe identifier wrappers.
//!
//! Games, seated players and the users behind them carry UUID v7
//! (time-ordered) identifiers so they can never be mixed up at compile time.
//! Build options come from the static rule book and are numbered when the
//! rule book is loaded, so they use a plain integer newtype instead.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a single match.
    GameId
}

define_id! {
    /// Unique identifier for a seat (a user playing in one game).
    PlayerId
}

define_id! {
    /// Identifier of an authenticated user, issued by the external account
    /// layer.
    UserId
}

/// Identifier of a build option in the rule book.
///
/// Assigned sequentially while loading rule data; stable for a given rule
/// file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct BuildOptionId(pub u32);

impl BuildOptionId {
    /// Return the raw index.
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for BuildOptionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
