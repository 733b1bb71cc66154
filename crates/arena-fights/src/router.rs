//! Axum router construction for the fights API.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::FightsState;

/// Build the complete Axum router for the fights service.
///
/// The router includes:
/// - `GET /api/fights/execute_fight` -- random fight
/// - `POST /api/fights` -- custom fight
/// - `GET /api/fights/randomfighters` -- random hero and villain
/// - `GET /api/fights/randomlocation` -- random location
/// - `GET /health` -- liveness and breaker states
///
/// CORS allows any origin so the UI can be served from elsewhere.
pub fn build_router(state: Arc<FightsState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/fights", post(handlers::custom_fight))
        .route("/api/fights/execute_fight", get(handlers::execute_fight))
        .route("/api/fights/randomfighters", get(handlers::random_fighters))
        .route("/api/fights/randomlocation", get(handlers::random_location))
        .route("/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
