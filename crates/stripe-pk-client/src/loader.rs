//! Publishable key loader.

use reqwest::Client;
use std::time::Duration;

use stripe_pk_core::{publishable_key_from_body, PublishableKey, STRIPE_PK_PATH};

use crate::error::{ClientError, InitError};

/// Fetches the publishable key from a site's `/api/stripe-pk` endpoint.
#[derive(Debug, Clone)]
pub struct KeyLoader {
    client: Client,
    base_url: String,
    strict_key_format: bool,
}

impl KeyLoader {
    /// Create a loader for the site at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, LoaderOptions::default())
    }

    /// Create a loader with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: LoaderOptions,
    ) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(secs) = options.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            strict_key_format: options.strict_key_format,
        })
    }

    /// Full URL of the key endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{STRIPE_PK_PATH}", self.base_url)
    }

    /// Issue one GET to the key endpoint and extract the key.
    ///
    /// # Errors
    ///
    /// Returns the [`InitError`] describing which step failed. Never
    /// [`InitError::SdkUnavailable`].
    pub async fn fetch_key(&self) -> Result<PublishableKey, InitError> {
        let response = self
            .client
            .get(self.endpoint())
            .send()
            .await
            .map_err(InitError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(InitError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(InitError::Transport)?;
        let body: serde_json::Value = serde_json::from_slice(&bytes).map_err(InitError::Decode)?;

        let Some(key) = publishable_key_from_body(&body) else {
            return Err(InitError::Rejected { body });
        };

        if self.strict_key_format {
            return PublishableKey::parse_strict(key).map_err(InitError::from);
        }
        Ok(key)
    }
}

/// Loader options.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Request timeout in seconds. `None` waits for as long as the server takes.
    pub timeout_seconds: Option<u64>,
    /// Reject keys not shaped like `pk_(test|live)_<alphanumeric>`.
    pub strict_key_format: bool,
}

impl LoaderOptions {
    /// Options with strict key validation enabled.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_key_format: true,
            ..Self::default()
        }
    }
}
