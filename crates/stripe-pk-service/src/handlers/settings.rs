//! Settings endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use stripe_pk_core::{
    is_valid_secret_key, redact, KeyResponse, PublishableKey, SettingSaved, SettingUpdate,
};

use crate::auth::MasterKeyAuth;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{PUBLISHABLE_KEY_SETTING, SECRET_KEY_SETTING};

/// `GET /api/export/settings/{key}`. Only the publishable key is readable.
pub async fn get_setting(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<KeyResponse>, ApiError> {
    if key != PUBLISHABLE_KEY_SETTING {
        return Err(ApiError::NotFound(key));
    }

    let key = state.publishable_key().await.ok_or(ApiError::NotSet)?;
    Ok(Json(KeyResponse::found(&key)))
}

/// `PUT /api/export/settings/{key}` with `{"value": ...}`.
///
/// Stripe keys are validated before being stored; other settings are stored as-is.
pub async fn put_setting(
    State(state): State<Arc<AppState>>,
    auth: MasterKeyAuth,
    Path(key): Path<String>,
    Json(body): Json<SettingUpdate>,
) -> Result<Json<SettingSaved>, ApiError> {
    let value = body.value.ok_or(ApiError::BadRequest {
        code: "missing_value",
    })?;

    let message = match key.as_str() {
        PUBLISHABLE_KEY_SETTING => {
            if PublishableKey::parse_strict(value.as_str()).is_err() {
                tracing::warn!(prefix = %redact(&value), "Invalid publishable key format");
                return Err(ApiError::BadRequest {
                    code: "invalid_publishable_key_format",
                });
            }
            "publishable_saved".to_string()
        }
        SECRET_KEY_SETTING => {
            if !is_valid_secret_key(&value) {
                tracing::warn!("Invalid secret key format");
                return Err(ApiError::BadRequest {
                    code: "invalid_secret_key_format",
                });
            }
            "secret_saved".to_string()
        }
        other => format!("{other}_saved"),
    };

    state.store.set(&key, value.as_str()).await?;

    // Never log secret values, even redacted
    if key == SECRET_KEY_SETTING {
        tracing::info!(client = %auth.client_name, setting = %key, "Setting updated");
    } else {
        tracing::info!(
            client = %auth.client_name,
            setting = %key,
            value = %redact(&value),
            "Setting updated"
        );
    }

    Ok(Json(SettingSaved {
        success: true,
        message,
    }))
}
