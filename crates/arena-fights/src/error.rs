//! Error types for the fights API.
//!
//! [`FightError`] is converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation:
//!
//! | Error | Status |
//! |---|---|
//! | invalid custom fight | 400 |
//! | upstream has nothing to return | 404 |
//! | upstream failed or circuit open | 502 |
//! | end-to-end deadline elapsed | 504 |

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::upstream::{Upstream, UpstreamError};

/// Errors that can occur while orchestrating a fight.
#[derive(Debug, thiserror::Error)]
pub enum FightError {
    /// One upstream call failed; no partial fight is built.
    #[error("{service} service unavailable: {cause}")]
    UpstreamUnavailable {
        /// The failing service.
        service: Upstream,
        /// What went wrong.
        #[source]
        cause: UpstreamError,
    },

    /// The request did not complete within its deadline.
    #[error("fight not completed within {}ms", .0.as_millis())]
    OrchestrationTimeout(Duration),

    /// A custom fight request is malformed or fails validation.
    #[error("invalid fight request: {0}")]
    InvalidInput(String),
}

impl From<validator::ValidationErrors> for FightError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::InvalidInput(errors.to_string())
    }
}

impl FightError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::UpstreamUnavailable {
                cause: UpstreamError::NotFound,
                ..
            } => StatusCode::NOT_FOUND,
            Self::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::OrchestrationTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for FightError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        if let Self::UpstreamUnavailable { service, cause } = &self {
            body["service"] = serde_json::Value::from(service.as_str());
            body["reason"] = serde_json::Value::from(cause.reason());
        }

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_failure_kind() {
        let unavailable = |cause| FightError::UpstreamUnavailable {
            service: Upstream::Heroes,
            cause,
        };
        assert_eq!(unavailable(UpstreamError::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(unavailable(UpstreamError::Timeout).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(unavailable(UpstreamError::CircuitOpen).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(unavailable(UpstreamError::Http(500)).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            FightError::OrchestrationTimeout(Duration::from_secs(8)).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            FightError::InvalidInput(String::new()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn message_names_the_service() {
        let err = FightError::UpstreamUnavailable {
            service: Upstream::Villains,
            cause: UpstreamError::CircuitOpen,
        };
        assert_eq!(err.to_string(), "villains service unavailable: circuit open");
    }
}
