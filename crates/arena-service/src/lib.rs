//! Process plumbing shared by the arena binaries.
//!
//! - [`config`] -- YAML + environment loading into a service's typed config
//! - [`telemetry`] -- `tracing` subscriber setup
//! - [`server`] -- bind, serve and shut down an Axum router

pub mod config;
pub mod server;
pub mod telemetry;

// Re-export primary types for convenience.
pub use config::{ConfigError, LogFormat, ServerConfig, duration_ms};
pub use server::{ServerError, serve};
pub use telemetry::init_tracing;
