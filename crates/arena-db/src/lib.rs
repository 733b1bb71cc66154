//! Data layer for the Superhero Arena catalog services.
//!
//! Each data service (heroes, villains, locations) reads one `PostgreSQL`
//! table. This crate provides the pool, the table stores, and the random
//! selector that serves `random_*` requests without scanning the table.
//!
//! # Architecture
//!
//! ```text
//! Handler
//!     |
//!     +-- RandomSelector<S> --> MAX(id) (cached) + first row with id >= r
//!     |
//!     +-- CatalogSource ------> FighterStore (hero | villain)
//!                               LocationStore
//!                               MemoryTable (tests)
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- `PostgreSQL` connection pool
//! - [`source`] -- Traits implemented by every catalog table
//! - [`catalog_store`] -- `PostgreSQL` fighter and location stores
//! - [`memory`] -- In-memory table for tests
//! - [`random`] -- Random row selection
//! - [`error`] -- Shared error types

pub mod catalog_store;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod random;
pub mod source;

// Re-export primary types for convenience.
pub use catalog_store::{FighterStore, FighterTable, LocationStore};
pub use error::{DbError, SelectError};
pub use memory::{Keyed, MemoryTable};
pub use postgres::PostgresPool;
pub use random::{DEFAULT_MAX_ID_TTL, RandomSelector};
pub use source::{CatalogSource, IdSource};
