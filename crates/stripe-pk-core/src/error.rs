//! Error types for stripe-pk core types.

/// Errors raised when constructing keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// The key was empty.
    #[error("publishable key is empty")]
    Empty,

    /// The key does not have the expected Stripe shape.
    #[error("malformed {expected} key: {prefix}")]
    Malformed {
        /// Which kind of key was expected ("publishable" or "secret").
        expected: &'static str,
        /// Redacted prefix of the offending value.
        prefix: String,
    },
}
