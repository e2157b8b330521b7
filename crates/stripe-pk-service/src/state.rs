//! Application state.

use std::sync::Arc;

use stripe_pk_core::PublishableKey;

use crate::config::ServiceConfig;
use crate::store::{SettingsStore, PUBLISHABLE_KEY_SETTING, SECRET_KEY_SETTING};

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Persisted settings.
    pub store: Arc<SettingsStore>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<SettingsStore>, config: ServiceConfig) -> Self {
        if config.stripe_publishable_key.is_none() {
            tracing::warn!("No publishable key configured - waiting for one via the settings API");
        }
        if config.master_api_key.is_none() {
            tracing::warn!("MASTER_API_KEY not set - settings writes are disabled");
        }

        Self { store, config }
    }

    /// The key to serve: the stored setting, else the configured key.
    pub async fn publishable_key(&self) -> Option<PublishableKey> {
        let stored = self.store.get(PUBLISHABLE_KEY_SETTING).await;
        stored
            .or_else(|| self.config.stripe_publishable_key.clone())
            .and_then(|key| PublishableKey::new(key).ok())
    }

    /// Whether a secret key is stored or configured.
    pub async fn has_secret_key(&self) -> bool {
        self.store.get(SECRET_KEY_SETTING).await.is_some()
            || self.config.stripe_secret_key.is_some()
    }
}
