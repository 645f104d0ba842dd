//! Auto-recharge settings handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use tollgate_core::AutoRechargeSettings;

use crate::auth::CallerIdentity;
use crate::customers::get_or_create_customer;
use crate::error::ApiError;
use crate::handlers::checkout::MIN_TOP_UP_CENTS;
use crate::state::AppState;

/// Auto-recharge settings response.
#[derive(Debug, Serialize)]
pub struct RechargeSettingsResponse {
    /// Whether auto-recharge is enabled.
    pub enabled: bool,
    /// Trigger threshold in cents.
    pub threshold_cents: i64,
    /// Recharge amount in cents.
    pub recharge_cents: i64,
}

impl From<&AutoRechargeSettings> for RechargeSettingsResponse {
    fn from(settings: &AutoRechargeSettings) -> Self {
        Self {
            enabled: settings.enabled,
            threshold_cents: settings.threshold_cents,
            recharge_cents: settings.recharge_cents,
        }
    }
}

/// Get the caller's auto-recharge settings (defaults if never configured).
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    identity: CallerIdentity,
) -> Result<Json<RechargeSettingsResponse>, ApiError> {
    let customer_ref = get_or_create_customer(&state, &identity).await?;

    let settings = state
        .store
        .get_recharge_settings(&customer_ref)?
        .unwrap_or_else(|| AutoRechargeSettings::disabled(customer_ref));

    Ok(Json(RechargeSettingsResponse::from(&settings)))
}

/// Auto-recharge settings update request.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    /// Whether to enable auto-recharge.
    pub enabled: bool,
    /// Trigger when balance drops to or below this (in cents).
    pub threshold_cents: Option<i64>,
    /// Amount to recharge (in cents).
    pub recharge_cents: Option<i64>,
}

/// Update the caller's auto-recharge settings.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    identity: CallerIdentity,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<RechargeSettingsResponse>, ApiError> {
    if let Some(threshold) = body.threshold_cents {
        if threshold < 0 {
            return Err(ApiError::Validation(
                "threshold_cents must not be negative".into(),
            ));
        }
    }
    if let Some(amount) = body.recharge_cents {
        if amount < MIN_TOP_UP_CENTS {
            return Err(ApiError::Validation(format!(
                "recharge_cents must be at least {MIN_TOP_UP_CENTS} cents ($5)"
            )));
        }
    }

    let customer_ref = get_or_create_customer(&state, &identity).await?;

    let mut settings = state
        .store
        .get_recharge_settings(&customer_ref)?
        .unwrap_or_else(|| AutoRechargeSettings::disabled(customer_ref.clone()));

    settings.enabled = body.enabled;
    if let Some(threshold) = body.threshold_cents {
        settings.threshold_cents = threshold;
    }
    if let Some(amount) = body.recharge_cents {
        settings.recharge_cents = amount;
    }

    state.store.put_recharge_settings(&settings)?;

    tracing::info!(
        customer_ref = %customer_ref,
        enabled = %settings.enabled,
        threshold_cents = %settings.threshold_cents,
        recharge_cents = %settings.recharge_cents,
        "Auto-recharge configured"
    );

    Ok(Json(RechargeSettingsResponse::from(&settings)))
}
