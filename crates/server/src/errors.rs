use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use service::diagram::errors::DiagramError;

/// HTTP wrapper over the coordinator's error taxonomy.
///
/// Only `NotFound` gets a dedicated user-facing status; everything else is a
/// generic failure with a `retryable` hint so callers can decide whether a
/// retry is sensible.
#[derive(Debug)]
pub struct ApiError(pub DiagramError);

impl From<DiagramError> for ApiError {
    fn from(e: DiagramError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DiagramError::Validation(_) => StatusCode::BAD_REQUEST,
            DiagramError::NotFound => StatusCode::NOT_FOUND,
            DiagramError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            DiagramError::Integrity(_) | DiagramError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            error!(code = self.0.code(), error = %self.0, "request failed");
        }
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "retryable": self.0.retryable(),
        });
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (DiagramError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DiagramError::NotFound, StatusCode::NOT_FOUND),
            (DiagramError::Storage("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (DiagramError::Integrity("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (DiagramError::Repository("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let resp = ApiError(err).into_response();
            assert_eq!(resp.status(), expected);
        }
    }
}
