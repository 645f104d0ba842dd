//! Processor webhook handlers.
//!
//! Webhook delivery is at-least-once: processed event ids are persisted and
//! a redelivered event is acknowledged without crediting again.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use std::str::FromStr;

use tollgate_core::CustomerRef;

use crate::error::ApiError;
use crate::processor::signature;
use crate::processor::types::WebhookEvent;
use crate::state::AppState;

/// Webhook acknowledgement.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Whether the webhook was received.
    pub received: bool,
}

/// Handle processor webhooks.
pub async fn stripe_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookResponse>, ApiError> {
    let Some(secret) = state.config.stripe_webhook_secret.as_ref() else {
        tracing::warn!("Webhook received but no signing secret is configured");
        return Err(ApiError::WebhookSignatureInvalid);
    };

    let sig = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::WebhookSignatureInvalid)?;

    signature::verify(secret, &body, sig).map_err(|e| {
        tracing::warn!(error = %e, "Invalid webhook signature");
        ApiError::WebhookSignatureInvalid
    })?;

    let event: WebhookEvent =
        serde_json::from_str(&body).map_err(|e| ApiError::Validation(e.to_string()))?;

    tracing::info!(
        event_type = %event.event_type,
        event_id = %event.id,
        "Received processor webhook"
    );

    match event.event_type.as_str() {
        "checkout.session.completed" => {
            handle_checkout_completed(&state, &event).await?;
        }
        _ => {
            tracing::debug!(event_type = %event.event_type, "Unhandled processor event");
        }
    }

    Ok(Json(WebhookResponse { received: true }))
}

/// Apply a completed checkout session as a credit top-up.
async fn handle_checkout_completed(
    state: &AppState,
    event: &WebhookEvent,
) -> Result<(), ApiError> {
    let data = &event.data.object;

    let session_id = data.get("id").and_then(|v| v.as_str()).unwrap_or("unknown");

    let payment_status = data
        .get("payment_status")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");

    // Only process if payment is captured
    if payment_status != "paid" {
        tracing::info!(
            session_id = %session_id,
            payment_status = %payment_status,
            "Checkout session not paid yet, skipping"
        );
        return Ok(());
    }

    let metadata = data.get("metadata");

    let purpose = metadata
        .and_then(|m| m.get("purpose"))
        .and_then(|v| v.as_str());
    if purpose != Some("add_credit") {
        tracing::debug!(
            session_id = %session_id,
            purpose = ?purpose,
            "Checkout session is not a credit top-up, skipping"
        );
        return Ok(());
    }

    let customer_ref = metadata
        .and_then(|m| m.get("customer_ref"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError::Validation("missing customer_ref in session metadata".into()))?;

    let amount_cents = metadata
        .and_then(|m| m.get("amount_cents"))
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<i64>().ok())
        .or_else(|| data.get("amount_total").and_then(serde_json::Value::as_i64))
        .ok_or_else(|| ApiError::Validation("missing amount_cents in session metadata".into()))?;

    // At-least-once delivery: a redelivered event must not credit twice.
    if state.store.has_processed_event(&event.id)? {
        tracing::info!(
            event_id = %event.id,
            session_id = %session_id,
            "Duplicate webhook delivery, skipping"
        );
        return Ok(());
    }

    let customer_ref =
        CustomerRef::from_str(customer_ref).map_err(|e| ApiError::Validation(e.to_string()))?;

    let balance = state
        .ledger
        .add_credit(&customer_ref, amount_cents, "Payment via hosted checkout")
        .await?;

    state.store.record_processed_event(&event.id, Utc::now())?;

    tracing::info!(
        customer_ref = %customer_ref,
        event_id = %event.id,
        session_id = %session_id,
        amount_cents = %amount_cents,
        remaining_cents = %balance.remaining_cents,
        "Credit applied from hosted checkout"
    );

    Ok(())
}
