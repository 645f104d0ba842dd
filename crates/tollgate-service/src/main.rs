//! Tollgate Service - HTTP API for prepaid usage credit
//!
//! This is the main entry point for the tollgate service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tollgate_service::processor::StripeClient;
use tollgate_service::{create_router, AppState, ServiceConfig};
use tollgate_store::RocksStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tollgate=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tollgate Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir,
        webhook_secret_configured = %config.stripe_webhook_secret.is_some(),
        signup_credit_cents = %config.signup_credit_cents,
        "Service configuration loaded"
    );

    // The processor owns the ledger; the service cannot run without it.
    let Some(api_key) = config.stripe_api_key.clone() else {
        tracing::error!("STRIPE_API_KEY is not configured; refusing to start");
        return Err("missing Stripe API key".into());
    };
    let processor = Arc::new(StripeClient::new(api_key));

    // Initialize RocksDB store
    tracing::info!(path = %config.data_dir, "Opening RocksDB store");
    let store = Arc::new(RocksStore::open(&config.data_dir)?);

    // Build app state
    let state = AppState::new(store, processor, config.clone());

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
