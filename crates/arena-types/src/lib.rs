//! Shared type definitions for the Superhero Arena.
//!
//! This crate is the single source of truth for the records exchanged
//! between the data services (heroes, villains, locations) and the fights
//! service. Types flow downstream to `TypeScript` via `ts-rs` for the UI.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for fight identifiers
//! - [`enums`] -- Team enumeration
//! - [`structs`] -- Fighters, locations, fight requests and results

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::Team;
pub use ids::FightId;
pub use structs::{FightRequest, FightResult, Fighter, Fighters, Location};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Bindings are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::FightId::export_all();
        let _ = crate::enums::Team::export_all();
        let _ = crate::structs::Fighter::export_all();
        let _ = crate::structs::Location::export_all();
        let _ = crate::structs::FightRequest::export_all();
        let _ = crate::structs::Fighters::export_all();
        let _ = crate::structs::FightResult::export_all();
    }
}
