//! SDK construction seam.
//!
//! Whether an SDK is available is decided by the caller when wiring the
//! bootstrap: pass `Some(factory)` to build a handle, `None` to only fetch
//! the key.

use stripe_pk_core::{KeyMode, PublishableKey};

/// Default Stripe API base used by [`StripeJs`].
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Builds an SDK handle from a publishable key.
pub trait StripeFactory: Send + Sync {
    /// The initialized SDK object.
    type Handle: Send + Sync;

    /// Construct a handle for `key`.
    fn create(&self, key: &PublishableKey) -> Self::Handle;
}

/// Factory for [`StripeHandle`]s.
#[derive(Debug, Clone)]
pub struct StripeJs {
    api_base: String,
}

impl StripeJs {
    /// Factory targeting the public Stripe API.
    #[must_use]
    pub fn new() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Factory targeting a custom API base (e.g. a mock).
    #[must_use]
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for StripeJs {
    fn default() -> Self {
        Self::new()
    }
}

impl StripeFactory for StripeJs {
    type Handle = StripeHandle;

    fn create(&self, key: &PublishableKey) -> StripeHandle {
        tracing::debug!(key = %key.redacted(), mode = %key.mode(), "Creating Stripe handle");
        StripeHandle {
            key: key.clone(),
            mode: key.mode(),
            api_base: self.api_base.clone(),
        }
    }
}

/// An initialized client-side Stripe handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeHandle {
    key: PublishableKey,
    mode: KeyMode,
    api_base: String,
}

impl StripeHandle {
    /// The key the handle was built with.
    #[must_use]
    pub fn publishable_key(&self) -> &PublishableKey {
        &self.key
    }

    /// Test or live mode.
    #[must_use]
    pub fn mode(&self) -> KeyMode {
        self.mode
    }

    /// API base URL requests are sent to.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Whether the handle talks to live mode.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.mode == KeyMode::Live
    }
}
