//! Client error types.

use stripe_pk_core::KeyError;

/// Why the publishable key bootstrap ended without an SDK handle.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The request never produced a response, or the body could not be read.
    #[error("request for publishable key failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Stripe publishable key not found on server (HTTP {status})")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The body was not valid JSON.
    #[error("invalid JSON in key response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The body was JSON but did not carry `success: true` and a key.
    #[error("No publishable key in response: {body}")]
    Rejected {
        /// The parsed body, as received.
        body: serde_json::Value,
    },

    /// The key failed the strict format check.
    #[error("invalid publishable key: {0}")]
    InvalidKey(#[from] KeyError),

    /// No SDK factory was supplied, so only the key is available.
    #[error("Stripe.js not loaded")]
    SdkUnavailable,
}

/// Coarse category of an [`InitError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitErrorKind {
    /// Network failure or non-OK status.
    Transport,
    /// Body was not JSON.
    Deserialization,
    /// `success: false`, missing key, or malformed key.
    Application,
    /// SDK constructor not available.
    Environment,
}

impl InitError {
    /// Category of this failure.
    #[must_use]
    pub const fn kind(&self) -> InitErrorKind {
        match self {
            Self::Transport(_) | Self::Status { .. } => InitErrorKind::Transport,
            Self::Decode(_) => InitErrorKind::Deserialization,
            Self::Rejected { .. } | Self::InvalidKey(_) => InitErrorKind::Application,
            Self::SdkUnavailable => InitErrorKind::Environment,
        }
    }

    /// Whether this is an unexpected failure (logged at error level) rather
    /// than an expected misconfiguration (logged as a warning).
    #[must_use]
    pub const fn is_unexpected(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode(_))
    }
}

/// Errors raised by the site tooling (verification and key push).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP client could not be built.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading a sites file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
