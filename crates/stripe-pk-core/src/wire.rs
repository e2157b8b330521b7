//! JSON bodies exchanged between sites and key consumers.

use serde::{Deserialize, Serialize};

use crate::key::{KeyMode, PublishableKey};

/// Path of the public publishable key endpoint.
pub const STRIPE_PK_PATH: &str = "/api/stripe-pk";

/// Path of the Stripe configuration health endpoint.
pub const STRIPE_HEALTH_PATH: &str = "/api/health/stripe";

/// Path of the settings endpoint holding the publishable key.
pub const PUBLISHABLE_KEY_SETTING_PATH: &str = "/api/export/settings/stripe_publishable_key";

/// Path of the settings endpoint holding the secret key.
pub const SECRET_KEY_SETTING_PATH: &str = "/api/export/settings/stripe_secret_key";

/// Body of `GET /api/stripe-pk`.
///
/// Every field is optional on the wire; a missing `success` reads as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyResponse {
    /// Whether the site has a key to hand out.
    #[serde(default)]
    pub success: bool,
    /// The publishable key, when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publishable_key: Option<String>,
    /// Error code when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KeyResponse {
    /// Response carrying a configured key.
    #[must_use]
    pub fn found(key: &PublishableKey) -> Self {
        Self {
            success: true,
            publishable_key: Some(key.as_str().to_string()),
            error: None,
        }
    }

    /// Response for a site without a configured key.
    #[must_use]
    pub fn not_set() -> Self {
        Self {
            success: false,
            publishable_key: None,
            error: Some("not_set".to_string()),
        }
    }
}

/// Extract the key from an already-parsed key endpoint body.
///
/// Only `success` and `publishable_key` are looked at, so unrelated fields of
/// any shape never hide a served key.
#[must_use]
pub fn publishable_key_from_body(body: &serde_json::Value) -> Option<PublishableKey> {
    if body.get("success") != Some(&serde_json::Value::Bool(true)) {
        return None;
    }
    body.get("publishable_key")
        .and_then(serde_json::Value::as_str)
        .and_then(|key| PublishableKey::new(key).ok())
}

/// Body of `GET /api/health/stripe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripeHealth {
    /// A publishable key is configured.
    #[serde(default)]
    pub publishable_key_configured: bool,
    /// A secret key is configured.
    #[serde(default)]
    pub secret_key_configured: bool,
    /// Mode of the configured publishable key.
    #[serde(default = "unknown_mode")]
    pub environment: KeyMode,
}

fn unknown_mode() -> KeyMode {
    KeyMode::Unknown
}

/// Body of `PUT /api/export/settings/{key}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingUpdate {
    /// New value for the setting.
    #[serde(default)]
    pub value: Option<String>,
}

/// Success body of a settings write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingSaved {
    /// Always `true`.
    pub success: bool,
    /// `<setting>_saved`.
    pub message: String,
}

/// Error body returned by the key service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
