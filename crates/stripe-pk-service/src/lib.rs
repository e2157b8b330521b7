//! Stripe publishable key service.
//!
//! This crate serves a site's Stripe configuration to browsers and tooling:
//!
//! - `GET /api/stripe-pk` hands out the publishable key
//! - `GET /api/health/stripe` reports which keys are configured
//! - `PUT /api/export/settings/:key` updates settings (master key required)
//!
//! The publishable key comes from the settings store when one was pushed,
//! otherwise from `.secrets/stripe.json` or `STRIPE_PUBLISHABLE_KEY`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod store;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use store::{SettingsStore, StoreError};
