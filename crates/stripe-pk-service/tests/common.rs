//! Common test utilities for stripe-pk service tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use stripe_pk_service::{create_router, AppState, ServiceConfig, SettingsStore};

/// Master key configured on test servers.
pub const MASTER_KEY: &str = "test-master-key";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the settings file (kept alive for test duration).
    pub temp_dir: TempDir,
}

impl TestHarness {
    /// Harness with no configured keys.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Harness with a publishable key coming from configuration.
    pub async fn with_configured_key(key: &str) -> Self {
        let key = key.to_string();
        Self::with_config(move |config| config.stripe_publishable_key = Some(key)).await
    }

    /// Harness with a customized configuration.
    pub async fn with_config(customize: impl FnOnce(&mut ServiceConfig)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let (router, _) = build_router(&temp_dir, customize).await;
        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, temp_dir }
    }

    /// Path of the settings file backing this harness.
    pub fn settings_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("settings.json")
    }
}

/// Build a router backed by a settings file in `temp_dir`.
pub async fn build_router(
    temp_dir: &TempDir,
    customize: impl FnOnce(&mut ServiceConfig),
) -> (Router, ServiceConfig) {
    let mut config = ServiceConfig {
        listen_addr: "127.0.0.1:0".into(),
        settings_path: temp_dir.path().join("settings.json"),
        master_api_key: Some(MASTER_KEY.to_string()),
        ..ServiceConfig::default()
    };
    customize(&mut config);

    let store = SettingsStore::open(&config.settings_path)
        .await
        .expect("Failed to open settings store");
    let state = AppState::new(Arc::new(store), config.clone());

    (create_router(state), config)
}

/// `X-API-Key` header name.
pub fn api_key_header() -> HeaderName {
    HeaderName::from_static("x-api-key")
}

/// Header value for a raw string.
pub fn header_value(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).expect("valid header value")
}
