//! Settings write tests.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{api_key_header, header_value, TestHarness, MASTER_KEY};

#[tokio::test]
async fn put_requires_master_key() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .put("/api/export/settings/stripe_publishable_key")
        .json(&json!({"value": "pk_test_abc"}))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn put_rejects_wrong_master_key() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .put("/api/export/settings/stripe_publishable_key")
        .add_header(api_key_header(), header_value("wrong-key"))
        .json(&json!({"value": "pk_test_abc"}))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn writes_disabled_without_master_key() {
    let harness = TestHarness::with_config(|config| config.master_api_key = None).await;

    let response = harness
        .server
        .put("/api/export/settings/stripe_publishable_key")
        .add_header(api_key_header(), header_value(MASTER_KEY))
        .json(&json!({"value": "pk_test_abc"}))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn put_publishable_key_then_serve_it() {
    let harness = TestHarness::with_configured_key("pk_test_fromconfig").await;

    let response = harness
        .server
        .put("/api/export/settings/stripe_publishable_key")
        .add_header(api_key_header(), header_value(MASTER_KEY))
        .json(&json!({"value": "pk_live_pushed"}))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({"success": true, "message": "publishable_saved"}));

    // Pushed value takes precedence over configuration
    let body: serde_json::Value = harness.server.get("/api/stripe-pk").await.json();
    assert_eq!(body["publishable_key"], "pk_live_pushed");

    let saved = std::fs::read_to_string(harness.settings_path()).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["stripe_publishable_key"], "pk_live_pushed");
}

#[tokio::test]
async fn put_rejects_malformed_publishable_key() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .put("/api/export/settings/stripe_publishable_key")
        .add_header(api_key_header(), header_value(MASTER_KEY))
        .json(&json!({"value": "sk_test_abc"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body,
        json!({"success": false, "error": "invalid_publishable_key_format"})
    );

    harness
        .server
        .get("/api/stripe-pk")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_requires_value() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .put("/api/export/settings/stripe_publishable_key")
        .add_header(api_key_header(), header_value(MASTER_KEY))
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "missing_value");
}

#[tokio::test]
async fn put_secret_key_is_validated_and_reported() {
    let harness = TestHarness::new().await;

    harness
        .server
        .put("/api/export/settings/stripe_secret_key")
        .add_header(api_key_header(), header_value(MASTER_KEY))
        .json(&json!({"value": "pk_test_abc"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = harness
        .server
        .put("/api/export/settings/stripe_secret_key")
        .add_header(api_key_header(), header_value(MASTER_KEY))
        .json(&json!({"value": "sk_test_abc123"}))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "secret_saved");

    let health: serde_json::Value = harness.server.get("/api/health/stripe").await.json();
    assert_eq!(health["secret_key_configured"], true);
}

#[tokio::test]
async fn put_generic_setting() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .put("/api/export/settings/site_name")
        .add_header(api_key_header(), header_value(MASTER_KEY))
        .json(&json!({"value": "Atelier"}))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "site_name_saved");
}
