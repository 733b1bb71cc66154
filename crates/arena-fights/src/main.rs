//! Fights service entry point for the Superhero Arena.

use std::sync::Arc;

use arena_fights::{
    FightOrchestrator, FightsConfig, FightsState, Upstream, UpstreamFactory, build_router,
};
use arena_resilience::CircuitBreakerRegistry;
use arena_service::init_tracing;
use tracing::info;

/// Application entry point.
///
/// Initializes logging, loads configuration, builds one client per data
/// service around a shared breaker registry, then serves until shut down.
///
/// # Errors
///
/// Returns an error if configuration is invalid, an HTTP client cannot be
/// built, or the server fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = FightsConfig::load()?;
    init_tracing(config.log_format);

    info!(
        host = config.server.host,
        port = config.server.port,
        heroes_url = config.upstreams.heroes_url,
        villains_url = config.upstreams.villains_url,
        locations_url = config.upstreams.locations_url,
        fight_deadline_ms = config.fight_deadline_ms,
        failure_threshold = config.circuit_breaker.failure_threshold,
        "configuration loaded"
    );

    let breakers = Arc::new(CircuitBreakerRegistry::new(
        config.circuit_breaker.breaker_config(),
    ));
    let factory = UpstreamFactory::new(config.upstreams.settings(), breakers);

    let orchestrator = FightOrchestrator::new(
        factory.client(Upstream::Heroes, &config.upstreams.heroes_url)?,
        factory.client(Upstream::Villains, &config.upstreams.villains_url)?,
        factory.client(Upstream::Locations, &config.upstreams.locations_url)?,
        config.fight_deadline(),
    );
    info!(
        deadline_ms = orchestrator.deadline().as_millis(),
        "orchestrator ready"
    );

    let state = Arc::new(FightsState::new(
        orchestrator,
        Arc::clone(factory.registry()),
    ));
    arena_service::serve(&config.server, "fights", build_router(state)).await?;

    Ok(())
}
