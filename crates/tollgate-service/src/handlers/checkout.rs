//! Hosted checkout top-up handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::CallerIdentity;
use crate::customers::get_or_create_customer;
use crate::error::ApiError;
use crate::state::AppState;

/// Minimum top-up: $5.
pub const MIN_TOP_UP_CENTS: i64 = 500;

/// Checkout session request.
#[derive(Debug, Deserialize)]
pub struct CheckoutSessionRequest {
    /// Top-up amount in cents.
    pub amount_cents: i64,
    /// URL to redirect to after payment.
    pub success_url: String,
    /// URL to redirect to when the customer cancels.
    pub cancel_url: String,
}

/// Checkout session response.
#[derive(Debug, Serialize)]
pub struct CheckoutSessionResponse {
    /// Hosted checkout URL to redirect the customer to.
    pub session_url: String,
    /// Session id for tracking.
    pub session_id: String,
}

/// Create a hosted checkout session for a credit top-up.
pub async fn create_checkout_session(
    State(state): State<Arc<AppState>>,
    identity: CallerIdentity,
    Json(body): Json<CheckoutSessionRequest>,
) -> Result<Json<CheckoutSessionResponse>, ApiError> {
    if body.amount_cents < MIN_TOP_UP_CENTS {
        return Err(ApiError::Validation(format!(
            "minimum top-up is {MIN_TOP_UP_CENTS} cents ($5)"
        )));
    }
    if body.success_url.is_empty() || body.cancel_url.is_empty() {
        return Err(ApiError::Validation(
            "success_url and cancel_url are required".into(),
        ));
    }

    let customer_ref = get_or_create_customer(&state, &identity).await?;

    let session = state
        .processor
        .create_checkout_session(
            &customer_ref,
            body.amount_cents,
            &body.success_url,
            &body.cancel_url,
        )
        .await
        .map_err(|e| {
            tracing::error!(
                customer_ref = %customer_ref,
                error = %e,
                "Failed to create checkout session"
            );
            ApiError::PaymentProcessingFailed(format!("failed to create checkout session: {e}"))
        })?;

    let session_url = session.url.ok_or_else(|| {
        ApiError::PaymentProcessingFailed("processor returned no checkout URL".into())
    })?;

    tracing::info!(
        customer_ref = %customer_ref,
        session_id = %session.id,
        amount_cents = %body.amount_cents,
        "Checkout session created"
    );

    Ok(Json(CheckoutSessionResponse {
        session_url,
        session_id: session.id,
    }))
}
