//! Axum router construction for a catalog service.

use std::sync::Arc;

use arena_db::CatalogSource;
use axum::Router;
use axum::routing::get;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::CatalogState;

/// Build the router for the kind held in `state`.
///
/// For `heroes` the router includes:
/// - `GET /api/heroes/random_hero` -- one random hero
/// - `GET /api/heroes` -- list heroes
/// - `GET /api/heroes/{id}` -- single hero
/// - `GET /health` -- liveness
///
/// and likewise `villains/random_villain` and `locations/random_location`.
pub fn build_router<S>(state: Arc<CatalogState<S>>) -> Router
where
    S: CatalogSource + 'static,
    S::Row: Serialize,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let kind = state.kind();
    let base = format!("/api/{}", kind.as_str());

    Router::new()
        .route(
            &format!("{base}/{}", kind.random_segment()),
            get(handlers::random::<S>),
        )
        .route(&base, get(handlers::list::<S>))
        .route(&format!("{base}/{{id}}"), get(handlers::get_by_id::<S>))
        .route("/health", get(handlers::health::<S>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
