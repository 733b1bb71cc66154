//! Shared state for the fights service.

use std::sync::Arc;

use arena_resilience::CircuitBreakerRegistry;

use crate::orchestrator::FightOrchestrator;

/// State shared by all fights handlers.
#[derive(Debug)]
pub struct FightsState {
    /// Builds fights from the data services.
    pub orchestrator: FightOrchestrator,
    /// Breakers guarding the data services, for health reporting.
    pub breakers: Arc<CircuitBreakerRegistry>,
}

impl FightsState {
    /// Bundle an orchestrator with the registry its clients draw from.
    pub const fn new(
        orchestrator: FightOrchestrator,
        breakers: Arc<CircuitBreakerRegistry>,
    ) -> Self {
        Self {
            orchestrator,
            breakers,
        }
    }
}
