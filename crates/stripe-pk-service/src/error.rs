//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use stripe_pk_core::ApiFailure;

use crate::store::StoreError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or invalid master key.
    #[error("unauthorized")]
    Unauthorized,

    /// No publishable key is configured.
    #[error("publishable key not set")]
    NotSet,

    /// Setting cannot be read through the API.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {code}")]
    BadRequest {
        /// Machine-readable error code.
        code: &'static str,
    },

    /// Persisting a setting failed.
    #[error("save failed: {0}")]
    SaveFailed(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            Self::NotSet => (StatusCode::NOT_FOUND, "not_set", None),
            Self::NotFound(key) => (StatusCode::NOT_FOUND, "not_found", Some(key.clone())),
            Self::BadRequest { code } => (StatusCode::BAD_REQUEST, *code, None),
            Self::SaveFailed(msg) => {
                tracing::error!(error = %msg, "Failed to save setting");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "save_failed",
                    Some(msg.clone()),
                )
            }
        };

        let body = ApiFailure {
            success: false,
            error: code.to_string(),
            detail,
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::SaveFailed(err.to_string())
    }
}
