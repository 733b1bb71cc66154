//! HTTP handlers for the catalog API.
//!
//! One set of generic handlers serves every kind; the entity type comes
//! from the backing table.

use std::num::ParseIntError;
use std::sync::Arc;

use arena_db::CatalogSource;
use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use crate::error::CatalogError;
use crate::state::CatalogState;

// ---------------------------------------------------------------------------
// Random
// ---------------------------------------------------------------------------

/// `GET /api/{kind}/random_*` -- one row chosen at random.
pub async fn random<S>(
    State(state): State<Arc<CatalogState<S>>>,
) -> Result<Json<S::Row>, CatalogError>
where
    S: CatalogSource,
    S::Row: Serialize,
{
    let kind = state.kind().as_str();
    let row = state
        .selector()
        .select()
        .await
        .map_err(|e| CatalogError::from_select(kind, e))?;
    Ok(Json(row))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// `GET /api/{kind}` -- every row ordered by id.
pub async fn list<S>(
    State(state): State<Arc<CatalogState<S>>>,
) -> Result<Json<Vec<S::Row>>, CatalogError>
where
    S: CatalogSource,
    S::Row: Serialize,
{
    Ok(Json(state.source().list_all().await?))
}

/// `GET /api/{kind}/{id}` -- a single row.
pub async fn get_by_id<S>(
    State(state): State<Arc<CatalogState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<S::Row>, CatalogError>
where
    S: CatalogSource,
    S::Row: Serialize,
{
    let id: i64 = id
        .parse()
        .map_err(|e: ParseIntError| CatalogError::InvalidId(format!("{id}: {e}")))?;
    state
        .source()
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(CatalogError::NotFound {
            kind: state.kind().as_str(),
            id,
        })
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// `GET /health` -- liveness.
pub async fn health<S: CatalogSource>(
    State(state): State<Arc<CatalogState<S>>>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": state.kind().as_str(),
    }))
}
