//! Data services for the Superhero Arena.
//!
//! One binary serves one table, chosen by [`CatalogKind`]:
//!
//! - **heroes** -- `GET /api/heroes/random_hero`, `/api/heroes`, `/api/heroes/{id}`
//! - **villains** -- `GET /api/villains/random_villain`, ...
//! - **locations** -- `GET /api/locations/random_location`, ...
//!
//! Random requests go through [`arena_db::RandomSelector`], so they cost one
//! cached aggregate and one indexed lookup rather than a table scan. An
//! empty table answers 404.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

// Re-export primary types for convenience.
pub use config::{CatalogConfig, CatalogKind};
pub use error::CatalogError;
pub use router::build_router;
pub use state::CatalogState;
