//! Credit balance, validation and deduction handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use tollgate_core::{CreditConsumption, Transaction};

use crate::auth::CallerIdentity;
use crate::customers::get_or_create_customer;
use crate::error::ApiError;
use crate::state::AppState;

/// Balance response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Credit still available, in cents.
    pub remaining_cents: i64,
    /// Lifetime granted credit, in cents.
    pub total_granted_cents: i64,
    /// Lifetime debited usage, in cents.
    pub total_used_cents: i64,
    /// Remaining credit formatted as dollars.
    pub remaining_formatted: String,
}

/// Get the caller's current credit balance.
pub async fn get_credit(
    State(state): State<Arc<AppState>>,
    identity: CallerIdentity,
) -> Result<Json<BalanceResponse>, ApiError> {
    let customer_ref = get_or_create_customer(&state, &identity).await?;
    let balance = state.ledger.get_balance(&customer_ref).await?;

    Ok(Json(BalanceResponse {
        remaining_cents: balance.remaining_cents,
        total_granted_cents: balance.total_granted_cents,
        total_used_cents: balance.total_used_cents,
        remaining_formatted: format!("${:.2}", balance.remaining_cents as f64 / 100.0),
    }))
}

/// Credit validation request.
#[derive(Debug, Deserialize)]
pub struct ValidateCreditRequest {
    /// Amount to check, in cents.
    pub amount_cents: i64,
}

/// Credit validation response.
#[derive(Debug, Serialize)]
pub struct ValidateCreditResponse {
    /// Whether the remaining credit covers the amount.
    pub has_enough_credit: bool,
    /// Remaining credit in cents.
    pub remaining_cents: i64,
}

/// Check whether the caller's credit covers an amount.
pub async fn validate_credit(
    State(state): State<Arc<AppState>>,
    identity: CallerIdentity,
    Json(body): Json<ValidateCreditRequest>,
) -> Result<Json<ValidateCreditResponse>, ApiError> {
    if body.amount_cents <= 0 {
        return Err(ApiError::Validation(
            "amount_cents must be positive".into(),
        ));
    }

    let customer_ref = get_or_create_customer(&state, &identity).await?;
    let balance = state.ledger.get_balance(&customer_ref).await?;

    Ok(Json(ValidateCreditResponse {
        has_enough_credit: balance.has_enough(body.amount_cents),
        remaining_cents: balance.remaining_cents,
    }))
}

/// Usage deduction request. Absent counters default to zero.
#[derive(Debug, Deserialize)]
pub struct DeductCreditRequest {
    /// Tool calls made.
    #[serde(default)]
    pub tool_calls: u64,
    /// Input tokens consumed.
    #[serde(default)]
    pub input_tokens: u64,
    /// Output tokens produced.
    #[serde(default)]
    pub output_tokens: u64,
}

/// Usage deduction response.
#[derive(Debug, Serialize)]
pub struct DeductCreditResponse {
    /// The priced breakdown of this deduction.
    pub consumption: CreditConsumption,
    /// Balance after the deduction, in cents.
    pub new_balance_cents: i64,
}

/// Price a usage report and deduct it from the caller's credit.
pub async fn deduct_credit(
    State(state): State<Arc<AppState>>,
    identity: CallerIdentity,
    Json(body): Json<DeductCreditRequest>,
) -> Result<Json<DeductCreditResponse>, ApiError> {
    if body.tool_calls == 0 && body.input_tokens == 0 && body.output_tokens == 0 {
        return Err(ApiError::Validation(
            "usage must include at least one tool call or token".into(),
        ));
    }

    let customer_ref = get_or_create_customer(&state, &identity).await?;

    let consumption =
        state
            .config
            .pricing
            .price_usage(body.tool_calls, body.input_tokens, body.output_tokens);

    let balance = state
        .ledger
        .deduct_credit(&customer_ref, consumption.total_cents, &consumption.summary())
        .await?;

    tracing::debug!(
        customer_ref = %customer_ref,
        cost_cents = %consumption.total_cents,
        new_balance = %balance.remaining_cents,
        "Usage deduction processed"
    );

    Ok(Json(DeductCreditResponse {
        consumption,
        new_balance_cents: balance.remaining_cents,
    }))
}

/// Transaction list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Maximum number of entries to return (default: 20, max: 100).
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    20
}

/// One ledger entry in a transaction listing.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Processor-assigned transaction id.
    pub id: String,
    /// Amount in cents (negative = credit granted, positive = debit).
    pub amount_cents: i64,
    /// Description.
    pub description: String,
    /// Timestamp.
    pub created_at: String,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.clone(),
            amount_cents: tx.amount_cents,
            description: tx.description.clone(),
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

/// Transaction listing response.
#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    /// Ledger entries, newest first.
    pub transactions: Vec<TransactionResponse>,
}

/// List the caller's most recent ledger entries.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    identity: CallerIdentity,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    let customer_ref = get_or_create_customer(&state, &identity).await?;

    let limit = query.limit.min(100);
    let transactions = state.ledger.list_recent(&customer_ref, limit).await?;

    Ok(Json(ListTransactionsResponse {
        transactions: transactions.iter().map(TransactionResponse::from).collect(),
    }))
}
