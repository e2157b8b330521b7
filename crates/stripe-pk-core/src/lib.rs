//! Core types for Stripe publishable key bootstrap.
//!
//! This crate provides the types shared by the key service, the loader and the
//! tooling that checks or pushes keys to sites:
//!
//! - **Keys**: `PublishableKey`, `SecretKey`, `KeyMode`
//! - **Wire bodies**: `KeyResponse`, `StripeHealth`, `SettingUpdate`, `SettingSaved`, `ApiFailure`
//!
//! # Key endpoint contract
//!
//! `GET /api/stripe-pk` answers `{ "success": bool, "publishable_key"?: string }`.
//! Any non-2xx status means the site has no key to hand out.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod key;
pub mod wire;

pub use error::KeyError;
pub use key::{is_valid_secret_key, mask_secret, redact, KeyMode, PublishableKey, SecretKey};
pub use wire::{
    publishable_key_from_body, ApiFailure, KeyResponse, SettingSaved, SettingUpdate, StripeHealth,
    PUBLISHABLE_KEY_SETTING_PATH, SECRET_KEY_SETTING_PATH, STRIPE_HEALTH_PATH, STRIPE_PK_PATH,
};
