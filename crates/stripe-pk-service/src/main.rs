//! Stripe PK Service - serves a site's publishable key.
//!
//! This is the main entry point for the stripe-pk service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stripe_pk_service::{create_router, AppState, ServiceConfig, SettingsStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,stripe_pk=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Stripe PK Service");

    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        settings_path = %config.settings_path.display(),
        publishable_key_configured = %config.stripe_publishable_key.is_some(),
        secret_key_configured = %config.stripe_secret_key.is_some(),
        settings_writable = %config.master_api_key.is_some(),
        "Service configuration loaded"
    );

    let store = Arc::new(SettingsStore::open(&config.settings_path).await?);

    let state = AppState::new(store, config.clone());
    let app = create_router(state);

    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
