//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{checkout, credit, health, recharge, webhooks};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Credit (caller identity header)
/// - `GET /v1/credit` - Get current balance
/// - `POST /v1/credit/validate` - Check whether credit covers an amount
/// - `POST /v1/credit/deduct` - Price a usage report and deduct it
/// - `GET /v1/credit/transactions` - List recent ledger entries
///
/// ## Top-ups (caller identity header)
/// - `POST /v1/checkout-session` - Create a hosted checkout session
/// - `GET /v1/auto-recharge` - Get auto-recharge settings
/// - `POST /v1/auto-recharge` - Update auto-recharge settings
///
/// ## Webhooks (signature verification)
/// - `POST /webhooks/stripe` - Processor webhooks
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Credit
        .route("/v1/credit", get(credit::get_credit))
        .route("/v1/credit/validate", post(credit::validate_credit))
        .route("/v1/credit/deduct", post(credit::deduct_credit))
        .route("/v1/credit/transactions", get(credit::list_transactions))
        // Top-ups
        .route(
            "/v1/checkout-session",
            post(checkout::create_checkout_session),
        )
        .route("/v1/auto-recharge", get(recharge::get_settings))
        .route("/v1/auto-recharge", post(recharge::update_settings))
        // Webhooks
        .route("/webhooks/stripe", post(webhooks::stripe_webhook))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
