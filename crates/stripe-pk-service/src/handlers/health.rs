//! Health check handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use stripe_pk_core::{KeyMode, StripeHealth};

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "stripe-pk".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Stripe configuration health: which keys are present and in which mode.
pub async fn stripe_health(State(state): State<Arc<AppState>>) -> Json<StripeHealth> {
    let key = state.publishable_key().await;

    Json(StripeHealth {
        publishable_key_configured: key.is_some(),
        secret_key_configured: state.has_secret_key().await,
        environment: key.map_or(KeyMode::Unknown, |k| k.mode()),
    })
}
