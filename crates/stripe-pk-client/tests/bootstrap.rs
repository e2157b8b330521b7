//! Bootstrap tests against a mock key endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stripe_pk_client::{
    init_from_server, InitError, InitErrorKind, KeyLoader, LoaderOptions, PublishableKey,
    StripeBootstrap, StripeFactory, StripeJs,
};

/// Factory that records how often it was asked for a handle.
#[derive(Default)]
struct CountingFactory {
    calls: Arc<AtomicUsize>,
}

impl StripeFactory for CountingFactory {
    type Handle = String;

    fn create(&self, key: &PublishableKey) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        format!("stripe:{key}")
    }
}

async fn server_answering(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stripe-pk"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn key_and_handle_are_set_on_success() {
    let server = server_answering(
        ResponseTemplate::new(200)
            .set_body_json(json!({"success": true, "publishable_key": "pk_test_123"})),
    )
    .await;
    let loader = KeyLoader::new(server.uri()).unwrap();

    let ctx = init_from_server(&loader, Some(&StripeJs::new())).await;

    assert_eq!(ctx.publishable_key().unwrap().as_str(), "pk_test_123");
    let handle = ctx.handle().expect("handle should be set");
    assert_eq!(handle.publishable_key().as_str(), "pk_test_123");
    assert!(!handle.is_live());
    assert!(ctx.failure().is_none());
}

#[tokio::test]
async fn not_found_leaves_everything_unset() {
    let server = server_answering(ResponseTemplate::new(404)).await;
    let loader = KeyLoader::new(server.uri()).unwrap();

    let ctx = init_from_server(&loader, Some(&StripeJs::new())).await;

    assert!(ctx.handle().is_none());
    assert!(ctx.publishable_key().is_none());
    assert!(matches!(ctx.failure(), Some(InitError::Status { status: 404 })));
}

#[tokio::test]
async fn unsuccessful_body_is_reported() {
    let server =
        server_answering(ResponseTemplate::new(200).set_body_json(json!({"success": false}))).await;
    let loader = KeyLoader::new(server.uri()).unwrap();

    let ctx = init_from_server(&loader, Some(&StripeJs::new())).await;

    assert!(ctx.handle().is_none());
    match ctx.failure() {
        Some(InitError::Rejected { body }) => assert_eq!(body, &json!({"success": false})),
        other => panic!("expected rejected body, got {other:?}"),
    }
}

#[tokio::test]
async fn success_without_key_is_rejected() {
    let server = server_answering(
        ResponseTemplate::new(200).set_body_json(json!({"success": true, "publishable_key": ""})),
    )
    .await;
    let loader = KeyLoader::new(server.uri()).unwrap();

    let err = loader.fetch_key().await.unwrap_err();
    assert_eq!(err.kind(), InitErrorKind::Application);
}

#[tokio::test]
async fn missing_sdk_keeps_key_but_no_handle() {
    let server = server_answering(
        ResponseTemplate::new(200)
            .set_body_json(json!({"success": true, "publishable_key": "pk_live_1"})),
    )
    .await;
    let loader = KeyLoader::new(server.uri()).unwrap();

    let ctx = init_from_server::<StripeJs>(&loader, None).await;

    assert_eq!(ctx.publishable_key().unwrap().as_str(), "pk_live_1");
    assert!(ctx.handle().is_none());
    assert_eq!(ctx.failure().unwrap().kind(), InitErrorKind::Environment);
}

#[tokio::test]
async fn invalid_json_is_contained() {
    let server =
        server_answering(ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;
    let loader = KeyLoader::new(server.uri()).unwrap();

    let ctx = init_from_server(&loader, Some(&StripeJs::new())).await;

    assert!(ctx.handle().is_none());
    assert!(matches!(ctx.failure(), Some(InitError::Decode(_))));
    assert!(ctx.failure().unwrap().is_unexpected());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    // Nothing listens on port 1.
    let loader = KeyLoader::new("http://127.0.0.1:1").unwrap();

    let ctx = init_from_server(&loader, Some(&StripeJs::new())).await;

    assert!(ctx.handle().is_none());
    assert!(matches!(ctx.failure(), Some(InitError::Transport(_))));
}

#[tokio::test]
async fn strict_loader_rejects_malformed_key() {
    let server = server_answering(
        ResponseTemplate::new(200)
            .set_body_json(json!({"success": true, "publishable_key": "not-a-key"})),
    )
    .await;

    let lenient = KeyLoader::new(server.uri()).unwrap();
    assert_eq!(lenient.fetch_key().await.unwrap().as_str(), "not-a-key");

    let strict = KeyLoader::with_options(server.uri(), LoaderOptions::strict()).unwrap();
    assert!(matches!(
        strict.fetch_key().await,
        Err(InitError::InvalidKey(_))
    ));
}

#[tokio::test]
async fn bootstrap_fetches_at_most_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stripe-pk"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "publishable_key": "pk_test_123"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let factory = CountingFactory::default();
    let calls = Arc::clone(&factory.calls);
    let bootstrap = StripeBootstrap::new(KeyLoader::new(server.uri()).unwrap(), Some(factory));

    let (first, second) = tokio::join!(bootstrap.init(), bootstrap.init());
    assert_eq!(first.handle().map(String::as_str), Some("stripe:pk_test_123"));
    assert!(std::ptr::eq(first, second));

    let third = bootstrap.init().await;
    assert!(third.is_ready());
    assert!(bootstrap.context().is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_bootstrap_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stripe-pk"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let bootstrap =
        StripeBootstrap::new(KeyLoader::new(server.uri()).unwrap(), Some(StripeJs::new()));

    assert!(bootstrap.init().await.handle().is_none());
    assert!(bootstrap.init().await.handle().is_none());
}

#[tokio::test]
async fn unrelated_fields_do_not_hide_the_key() {
    let server = server_answering(ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "publishable_key": "pk_test_1",
        "error": {"code": 0}
    })))
    .await;
    let loader = KeyLoader::new(server.uri()).unwrap();

    let ctx = init_from_server(&loader, Some(&StripeJs::new())).await;

    assert_eq!(ctx.publishable_key().unwrap().as_str(), "pk_test_1");
    assert!(ctx.is_ready());
    assert!(ctx.failure().is_none());
}
