//! Publishable key endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use stripe_pk_core::KeyResponse;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/stripe-pk`: hand out the publishable key.
pub async fn get_publishable_key(
    State(state): State<Arc<AppState>>,
) -> Result<Json<KeyResponse>, ApiError> {
    let key = state.publishable_key().await.ok_or(ApiError::NotSet)?;
    Ok(Json(KeyResponse::found(&key)))
}
