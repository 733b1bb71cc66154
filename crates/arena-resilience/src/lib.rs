//! Resilience primitives shared by the arena services.
//!
//! - [`circuit_breaker`] -- per-dependency breaker with a single half-open probe
//! - [`registry`] -- injectable set of breakers keyed by dependency name
//! - [`retry`] -- bounded retry with capped exponential backoff

pub mod circuit_breaker;
pub mod registry;
pub mod retry;

// Re-export primary types for convenience.
pub use circuit_breaker::{
    CallPermit, CircuitBreaker, CircuitBreakerConfig, CircuitOpen, CircuitSnapshot, CircuitState,
};
pub use registry::CircuitBreakerRegistry;
pub use retry::{RetryPolicy, with_retry};
