//! Shared type definitions for the Evolve board game engine.
//!
//! Identifiers and enumerations used by the rule book, the game engine and
//! the (external) view layer. Types flow downstream to `TypeScript` via
//! `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers for games, players, users and options
//! - [`enums`] -- Directions, actions, building kinds, battle outcomes

pub mod enums;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use enums::{ActionKind, BattleOutcome, BuildingKind, Direction, GameStatus};
pub use ids::{BuildOptionId, GameId, PlayerId, UserId};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::GameId::export_all();
        let _ = crate::ids::PlayerId::export_all();
        let _ = crate::ids::UserId::export_all();
        let _ = crate::ids::BuildOptionId::export_all();

        let _ = crate::enums::Direction::export_all();
        let _ = crate::enums::ActionKind::export_all();
        let _ = crate::enums::BuildingKind::export_all();
        let _ = crate::enums::BattleOutcome::export_all();
        let _ = crate::enums::GameStatus::export_all();
    }
}
