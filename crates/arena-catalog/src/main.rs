//! Data service entry point for the Superhero Arena.
//!
//! Loads configuration, waits for the database, then serves the table named
//! by `kind` (heroes, villains or locations) until shut down.

use std::sync::Arc;

use arena_catalog::{CatalogConfig, CatalogKind, CatalogState, build_router};
use arena_db::{
    CatalogSource, FighterStore, FighterTable, LocationStore, PostgresPool, RandomSelector,
};
use arena_resilience::with_retry;
use arena_service::{ServerError, init_tracing};
use serde::Serialize;
use tracing::info;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the database stays
/// unreachable for the whole retry budget, or the server fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CatalogConfig::load()?;
    init_tracing(config.log_format);

    info!(
        kind = %config.kind,
        host = config.server.host,
        port = config.server.port,
        max_connections = config.max_connections,
        max_id_cache_secs = config.max_id_cache_secs,
        "configuration loaded"
    );

    let pool = with_retry(
        &config.startup_retry.policy(),
        "connect to PostgreSQL",
        |_| PostgresPool::connect(&config.database_url, config.max_connections),
    )
    .await?;

    let served = match config.kind {
        CatalogKind::Heroes => {
            serve(&config, FighterStore::new(pool.pool().clone(), FighterTable::Hero)).await
        }
        CatalogKind::Villains => {
            serve(&config, FighterStore::new(pool.pool().clone(), FighterTable::Villain)).await
        }
        CatalogKind::Locations => serve(&config, LocationStore::new(pool.pool().clone())).await,
    };

    pool.close().await;
    served?;
    Ok(())
}

async fn serve<S>(config: &CatalogConfig, store: S) -> Result<(), ServerError>
where
    S: CatalogSource + 'static,
    S::Row: Serialize,
{
    let selector = RandomSelector::with_ttl(store, config.max_id_ttl());
    let state = Arc::new(CatalogState::new(config.kind, selector));
    arena_service::serve(&config.server, config.kind.as_str(), build_router(state)).await
}
