//! Once-only Stripe initialization.
//!
//! [`init_from_server`] runs the whole bootstrap: fetch the key, then build
//! a handle if a factory was supplied. It never fails; every failure path is
//! logged and recorded in the returned [`StripeContext`]. [`StripeBootstrap`]
//! wraps it so the fetch happens at most once per instance.

use tokio::sync::OnceCell;

use stripe_pk_core::PublishableKey;

use crate::error::InitError;
use crate::loader::KeyLoader;
use crate::sdk::StripeFactory;

/// Outcome of the bootstrap, handed to whatever needs the SDK.
///
/// `handle` is only ever set when `publishable_key` is set and a factory
/// was available.
#[derive(Debug)]
pub struct StripeContext<H> {
    publishable_key: Option<PublishableKey>,
    handle: Option<H>,
    failure: Option<InitError>,
}

impl<H> StripeContext<H> {
    fn ready(key: PublishableKey, handle: H) -> Self {
        Self {
            publishable_key: Some(key),
            handle: Some(handle),
            failure: None,
        }
    }

    fn key_only(key: PublishableKey) -> Self {
        Self {
            publishable_key: Some(key),
            handle: None,
            failure: Some(InitError::SdkUnavailable),
        }
    }

    fn failed(failure: InitError) -> Self {
        Self {
            publishable_key: None,
            handle: None,
            failure: Some(failure),
        }
    }

    /// The fetched key, if the server provided one.
    #[must_use]
    pub fn publishable_key(&self) -> Option<&PublishableKey> {
        self.publishable_key.as_ref()
    }

    /// The SDK handle, or `None` on any failure path.
    #[must_use]
    pub fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    /// Why no handle was produced.
    #[must_use]
    pub fn failure(&self) -> Option<&InitError> {
        self.failure.as_ref()
    }

    /// Whether a handle is available.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.handle.is_some()
    }

    /// Take the handle out of the context.
    #[must_use]
    pub fn into_handle(self) -> Option<H> {
        self.handle
    }
}

/// Fetch the publishable key and build the SDK handle.
///
/// Pass `None` for `factory` when no SDK is available; the key is still
/// fetched and recorded.
pub async fn init_from_server<F: StripeFactory>(
    loader: &KeyLoader,
    factory: Option<&F>,
) -> StripeContext<F::Handle> {
    let key = match loader.fetch_key().await {
        Ok(key) => key,
        Err(err) => {
            log_failure(&err, loader);
            return StripeContext::failed(err);
        }
    };

    match factory {
        Some(factory) => {
            let handle = factory.create(&key);
            tracing::info!(key = %key.redacted(), mode = %key.mode(), "Stripe initialized");
            StripeContext::ready(key, handle)
        }
        None => {
            log_failure(&InitError::SdkUnavailable, loader);
            StripeContext::key_only(key)
        }
    }
}

fn log_failure(err: &InitError, loader: &KeyLoader) {
    let endpoint = loader.endpoint();
    match err {
        InitError::Transport(_) | InitError::Decode(_) => {
            tracing::error!(%endpoint, error = %err, "Stripe initialization failed");
        }
        InitError::Status { status } => {
            tracing::warn!(%endpoint, status, "Stripe publishable key not found on server");
        }
        InitError::Rejected { body } => {
            tracing::warn!(%endpoint, %body, "No publishable key in response");
        }
        InitError::InvalidKey(e) => {
            tracing::warn!(%endpoint, error = %e, "Publishable key rejected");
        }
        InitError::SdkUnavailable => {
            tracing::warn!(%endpoint, "Stripe.js not loaded");
        }
    }
}

/// Runs [`init_from_server`] at most once.
///
/// Concurrent callers of [`StripeBootstrap::init`] share the same execution;
/// later callers get the stored context without another request.
pub struct StripeBootstrap<F: StripeFactory> {
    loader: KeyLoader,
    factory: Option<F>,
    context: OnceCell<StripeContext<F::Handle>>,
}

impl<F: StripeFactory> StripeBootstrap<F> {
    /// Wire a bootstrap from a loader and an optional SDK factory.
    #[must_use]
    pub fn new(loader: KeyLoader, factory: Option<F>) -> Self {
        Self {
            loader,
            factory,
            context: OnceCell::new(),
        }
    }

    /// Run the bootstrap if it has not run yet and return its context.
    pub async fn init(&self) -> &StripeContext<F::Handle> {
        self.context
            .get_or_init(|| init_from_server(&self.loader, self.factory.as_ref()))
            .await
    }

    /// The context, if [`StripeBootstrap::init`] has completed.
    #[must_use]
    pub fn context(&self) -> Option<&StripeContext<F::Handle>> {
        self.context.get()
    }
}

impl<F> std::fmt::Debug for StripeBootstrap<F>
where
    F: StripeFactory + std::fmt::Debug,
    F::Handle: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeBootstrap")
            .field("endpoint", &self.loader.endpoint())
            .field("factory", &self.factory)
            .field("context", &self.context.get())
            .finish()
    }
}
