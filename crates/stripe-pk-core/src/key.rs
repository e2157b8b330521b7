//! Stripe key types.
//!
//! A [`PublishableKey`] is the non-secret credential a client-side SDK is
//! initialized with. Construction only requires a non-empty value; the strict
//! `pk_(test|live)_<alphanumeric>` shape is checked on demand with
//! [`PublishableKey::parse_strict`] or [`PublishableKey::is_well_formed`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::KeyError;

/// Number of characters kept when a key is redacted for display.
const REDACTED_PREFIX_LEN: usize = 15;

/// Secrets shorter than this are masked entirely.
const SECRET_MASK_MIN_LEN: usize = 10;

/// Stripe environment a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    /// Test mode (`pk_test_` / `sk_test_`).
    Test,
    /// Live mode (`pk_live_` / `sk_live_`).
    Live,
    /// Prefix not recognised, or no key at all.
    Unknown,
}

impl KeyMode {
    /// Derive the mode from a raw publishable or secret key.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        let rest = key
            .strip_prefix("pk_")
            .or_else(|| key.strip_prefix("sk_"))
            .unwrap_or_default();

        if rest.starts_with("test_") {
            Self::Test
        } else if rest.starts_with("live_") {
            Self::Live
        } else {
            Self::Unknown
        }
    }

    /// Lowercase name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Live => "live",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Stripe publishable key.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublishableKey(String);

impl PublishableKey {
    /// Wrap a raw key. Only rejects the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Empty`] if `value` is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, KeyError> {
        let value = value.into();
        if value.is_empty() {
            return Err(KeyError::Empty);
        }
        Ok(Self(value))
    }

    /// Wrap a raw key, requiring the `pk_(test|live)_<alphanumeric>` shape.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Empty`] or [`KeyError::Malformed`].
    pub fn parse_strict(value: impl Into<String>) -> Result<Self, KeyError> {
        let key = Self::new(value)?;
        if key.is_well_formed() {
            Ok(key)
        } else {
            Err(KeyError::Malformed {
                expected: "publishable",
                prefix: key.redacted(),
            })
        }
    }

    /// Whether the key matches `^pk_(test|live)_[A-Za-z0-9]+$`.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        has_stripe_shape(&self.0, "pk")
    }

    /// The mode encoded in the key prefix.
    #[must_use]
    pub fn mode(&self) -> KeyMode {
        KeyMode::from_key(&self.0)
    }

    /// The raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first characters of the key followed by `...`, for logs.
    #[must_use]
    pub fn redacted(&self) -> String {
        redact(&self.0)
    }
}

impl FromStr for PublishableKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for PublishableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublishableKey({})", self.redacted())
    }
}

impl fmt::Display for PublishableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PublishableKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PublishableKey> for String {
    fn from(key: PublishableKey) -> Self {
        key.0
    }
}

impl AsRef<str> for PublishableKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A Stripe secret key.
///
/// Neither `Debug` nor any other formatting shows more than [`mask_secret`]
/// does; the raw value is only reachable through [`SecretKey::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    /// Wrap a raw secret key, requiring the `sk_(test|live)_<alphanumeric>` shape.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Malformed`] with a masked prefix.
    pub fn parse(value: impl Into<String>) -> Result<Self, KeyError> {
        let value = value.into();
        if is_valid_secret_key(&value) {
            Ok(Self(value))
        } else {
            Err(KeyError::Malformed {
                expected: "secret",
                prefix: mask_secret(&value),
            })
        }
    }

    /// The mode encoded in the key prefix.
    #[must_use]
    pub fn mode(&self) -> KeyMode {
        KeyMode::from_key(&self.0)
    }

    /// The masked key, for logs and terminal output.
    #[must_use]
    pub fn masked(&self) -> String {
        mask_secret(&self.0)
    }

    /// The raw key, for the request body only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({})", self.masked())
    }
}

/// Whether `value` matches `^sk_(test|live)_[A-Za-z0-9]+$`.
#[must_use]
pub fn is_valid_secret_key(value: &str) -> bool {
    has_stripe_shape(value, "sk")
}

/// Shorten a key or secret for logging.
#[must_use]
pub fn redact(value: &str) -> String {
    match value.char_indices().nth(REDACTED_PREFIX_LEN) {
        Some((idx, _)) => format!("{}...", &value[..idx]),
        None => value.to_string(),
    }
}

/// Mask a secret: first 6 and last 4 characters, `***` for short values.
#[must_use]
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < SECRET_MASK_MIN_LEN {
        return "***".to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

fn has_stripe_shape(value: &str, kind: &str) -> bool {
    let Some(rest) = value
        .strip_prefix(kind)
        .and_then(|rest| rest.strip_prefix('_'))
    else {
        return false;
    };

    let body = rest
        .strip_prefix("test_")
        .or_else(|| rest.strip_prefix("live_"));

    matches!(body, Some(body) if !body.is_empty() && body.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(PublishableKey::new(""), Err(KeyError::Empty)));
    }

    #[test]
    fn lenient_key_accepts_any_non_empty_value() {
        let key = PublishableKey::new("not-a-stripe-key").unwrap();
        assert!(!key.is_well_formed());
        assert_eq!(key.mode(), KeyMode::Unknown);
    }

    #[test]
    fn strict_parse_accepts_test_and_live_keys() {
        let test = PublishableKey::parse_strict("pk_test_123").unwrap();
        assert_eq!(test.mode(), KeyMode::Test);

        let live = PublishableKey::parse_strict("pk_live_1").unwrap();
        assert_eq!(live.mode(), KeyMode::Live);
    }

    #[test]
    fn strict_parse_rejects_bad_shapes() {
        for bad in ["pk_test_", "pk_prod_abc", "sk_test_abc", "pk_test_ab-c", "pk_live_a b"] {
            assert!(
                matches!(PublishableKey::parse_strict(bad), Err(KeyError::Malformed { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn secret_key_shape() {
        assert!(is_valid_secret_key("sk_live_abcDEF123"));
        assert!(!is_valid_secret_key("pk_live_abcDEF123"));
        assert!(!is_valid_secret_key("sk_live_"));
    }

    #[test]
    fn secret_key_is_masked_everywhere() {
        let secret = SecretKey::parse("sk_live_abcdefghij1234").unwrap();
        assert_eq!(secret.masked(), "sk_liv...1234");
        assert_eq!(format!("{secret:?}"), "SecretKey(sk_liv...1234)");
        assert_eq!(secret.mode(), KeyMode::Live);
        assert_eq!(secret.expose(), "sk_live_abcdefghij1234");
    }

    #[test]
    fn malformed_secret_error_does_not_leak_value() {
        let err = SecretKey::parse("pk_live_abcdefghij1234").unwrap_err();
        assert_eq!(
            err,
            KeyError::Malformed {
                expected: "secret",
                prefix: "pk_liv...1234".to_string(),
            }
        );
        assert_eq!(mask_secret("sk_test_1"), "***");
    }

    #[test]
    fn mode_from_secret_key() {
        assert_eq!(KeyMode::from_key("sk_test_abc"), KeyMode::Test);
        assert_eq!(KeyMode::from_key("rk_live_abc"), KeyMode::Unknown);
    }

    #[test]
    fn redaction_keeps_short_values() {
        assert_eq!(redact("pk_test_123"), "pk_test_123");
        assert_eq!(redact("pk_test_1234567890abc"), "pk_test_1234567...");
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = PublishableKey::new("pk_live_51Habcdefghijklmnop").unwrap();
        assert_eq!(format!("{key:?}"), "PublishableKey(pk_live_51Habcd...)");
        assert_eq!(key.to_string(), "pk_live_51Habcdefghijklmnop");
    }

    #[test]
    fn serde_rejects_empty_key() {
        let parsed: Result<PublishableKey, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());

        let key: PublishableKey = serde_json::from_str("\"pk_test_123\"").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"pk_test_123\"");
    }
}
