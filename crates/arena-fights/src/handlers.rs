//! HTTP handlers for the fights API.

use std::sync::Arc;

use arena_types::{FightRequest, FightResult, Fighters, Location};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use crate::error::FightError;
use crate::orchestrator;
use crate::state::FightsState;

// ---------------------------------------------------------------------------
// Fights
// ---------------------------------------------------------------------------

/// `GET /api/fights/execute_fight` -- fight random opponents at a random
/// location.
pub async fn execute_fight(
    State(state): State<Arc<FightsState>>,
) -> Result<Json<FightResult>, FightError> {
    Ok(Json(state.orchestrator.execute_fight().await?))
}

/// `POST /api/fights` -- fight caller-supplied opponents.
///
/// Malformed JSON is reported as 400 with the same body shape as a
/// validation failure.
pub async fn custom_fight(
    payload: Result<Json<FightRequest>, JsonRejection>,
) -> Result<Json<FightResult>, FightError> {
    let Json(request) = payload.map_err(|e| FightError::InvalidInput(e.body_text()))?;
    Ok(Json(orchestrator::custom_fight(request)?))
}

// ---------------------------------------------------------------------------
// Random draws
// ---------------------------------------------------------------------------

/// `GET /api/fights/randomfighters` -- one hero and one villain.
pub async fn random_fighters(
    State(state): State<Arc<FightsState>>,
) -> Result<Json<Fighters>, FightError> {
    Ok(Json(state.orchestrator.random_fighters().await?))
}

/// `GET /api/fights/randomlocation` -- one location.
pub async fn random_location(
    State(state): State<Arc<FightsState>>,
) -> Result<Json<Location>, FightError> {
    Ok(Json(state.orchestrator.random_location().await?))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// `GET /health` -- liveness plus the breaker state of each upstream.
pub async fn health(State(state): State<Arc<FightsState>>) -> Json<serde_json::Value> {
    let upstreams: Vec<serde_json::Value> = state
        .breakers
        .snapshots()
        .into_iter()
        .map(|(service, snapshot)| {
            serde_json::json!({
                "service": service,
                "state": snapshot.state,
                "consecutiveFailures": snapshot.consecutive_failures,
            })
        })
        .collect();

    Json(serde_json::json!({
        "status": "ok",
        "upstreams": upstreams,
    }))
}
