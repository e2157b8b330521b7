//! Authentication extractors.
//!
//! Settings writes require the `X-API-Key` header to match the configured
//! master key. Reading the publishable key is public.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// A request carrying the master API key.
#[derive(Debug, Clone)]
pub struct MasterKeyAuth {
    /// Caller identifier from `X-Client-Name`, for audit logging.
    pub client_name: String,
}

impl FromRequestParts<Arc<AppState>> for MasterKeyAuth {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let api_key = parts
                .headers
                .get("x-api-key")
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?;

            // No master key configured means writes are disabled
            let expected_key = state
                .config
                .master_api_key
                .as_ref()
                .ok_or(ApiError::Unauthorized)?;

            if api_key != expected_key {
                tracing::warn!("Rejected settings write with wrong master key");
                return Err(ApiError::Unauthorized);
            }

            let client_name = parts
                .headers
                .get("x-client-name")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();

            Ok(MasterKeyAuth { client_name })
        })
    }
}
