//! Stripe publishable key client.
//!
//! This crate fetches a site's Stripe publishable key and turns it into an SDK
//! handle, and provides the tooling used to check and push keys across sites.
//!
//! # Example
//!
//! ```no_run
//! use stripe_pk_client::{KeyLoader, StripeBootstrap, StripeJs};
//!
//! # async fn example() -> Result<(), stripe_pk_client::ClientError> {
//! let loader = KeyLoader::new("https://shop.example.fr")?;
//! let bootstrap = StripeBootstrap::new(loader, Some(StripeJs::new()));
//!
//! let context = bootstrap.init().await;
//! if let Some(stripe) = context.handle() {
//!     println!("Stripe ready in {} mode", stripe.mode());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bootstrap;
mod error;
mod loader;
mod push;
mod sdk;
mod sites;
mod verify;

pub use bootstrap::{init_from_server, StripeBootstrap, StripeContext};
pub use error::{ClientError, InitError, InitErrorKind};
pub use loader::{KeyLoader, LoaderOptions};
pub use push::{PushOutcome, PushSummary, DEFAULT_PUSH_CONCURRENCY};
pub use sdk::{StripeFactory, StripeHandle, StripeJs, DEFAULT_API_BASE};
pub use sites::{load_sites, parse_sites, site_url, SiteClient, DEFAULT_SITE_TIMEOUT_SECONDS};
pub use verify::{KeyCheck, SiteReport, VerificationSummary};

pub use stripe_pk_core::{redact, KeyMode, PublishableKey, SecretKey};
