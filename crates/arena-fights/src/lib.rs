//! Fight orchestration service for the Superhero Arena.
//!
//! The fights service owns no data. Each random fight asks the heroes,
//! villains and locations services for one entity apiece, concurrently,
//! and resolves the winner locally.
//!
//! # Architecture
//!
//! ```text
//!                    +--> UpstreamClient(heroes)    --> GET /api/heroes/random_hero
//! FightOrchestrator -+--> UpstreamClient(villains)  --> GET /api/villains/random_villain
//!    (deadline)      +--> UpstreamClient(locations) --> GET /api/locations/random_location
//!         |
//!         +--> resolve(hero, villain, location) --> FightResult
//! ```
//!
//! Each client carries its own connection pool, in-flight cap and circuit
//! breaker. A failed or short-circuited upstream fails the whole request;
//! there are no fallback fighters.
//!
//! # Modules
//!
//! - [`upstream`] -- Resilient HTTP clients and their factory
//! - [`resolver`] -- Pure winner/loser decision
//! - [`orchestrator`] -- Concurrent fan-out under a deadline
//! - [`handlers`], [`router`] -- HTTP surface
//! - [`config`] -- Typed configuration
//! - [`error`] -- [`FightError`] and its HTTP mapping

pub mod config;
pub mod error;
pub mod handlers;
pub mod orchestrator;
pub mod resolver;
pub mod router;
pub mod state;
pub mod upstream;

// Re-export primary types for convenience.
pub use config::FightsConfig;
pub use error::FightError;
pub use orchestrator::{FightOrchestrator, custom_fight};
pub use resolver::{FightStamp, resolve};
pub use router::build_router;
pub use state::FightsState;
pub use upstream::{Upstream, UpstreamClient, UpstreamError, UpstreamFactory, UpstreamSettings};
