//! Error types for the catalog API.
//!
//! [`CatalogError`] is converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. An empty
//! table answers 404 so the fights service can tell "no data" apart from
//! "service broken".

use arena_db::{DbError, SelectError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the catalog API layer.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The table has no rows to pick from.
    #[error("no {0} available")]
    EmptyCollection(&'static str),

    /// No row has the requested id.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Plural entity name.
        kind: &'static str,
        /// The requested id.
        id: i64,
    },

    /// The id path segment is not an integer.
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// The database failed.
    #[error("database error: {0}")]
    Database(#[from] DbError),
}

impl CatalogError {
    /// Map a selector error for the table `kind`.
    pub fn from_select(kind: &'static str, err: SelectError) -> Self {
        match err {
            SelectError::EmptyCollection => Self::EmptyCollection(kind),
            SelectError::Db(e) => Self::Database(e),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::EmptyCollection(_) | Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::Database(e) => {
                tracing::error!(error = %e, "catalog query failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
