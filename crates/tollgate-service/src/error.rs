//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::ledger::LedgerError;
use crate::processor::ProcessorError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Caller identity is missing.
    #[error("authentication required")]
    AuthenticationRequired,

    /// Invalid input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Customer not found.
    #[error("customer not found: {0}")]
    CustomerNotFound(String),

    /// Insufficient credit for the requested deduction.
    ///
    /// A normal, expected outcome; surfaced to the caller and never logged
    /// as an error.
    #[error("insufficient credit: remaining={remaining}, requested={requested}")]
    InsufficientCredit {
        /// Remaining credit in cents.
        remaining: i64,
        /// Requested amount in cents.
        requested: i64,
    },

    /// The processor declined or failed a customer-initiated payment.
    #[error("payment processing failed: {0}")]
    PaymentProcessingFailed(String),

    /// Webhook signature verification failed or no secret is configured.
    #[error("invalid webhook signature")]
    WebhookSignatureInvalid,

    /// The payment processor timed out or is unreachable.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                "authentication_required",
                self.to_string(),
                None,
            ),
            Self::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                msg.clone(),
                None,
            ),
            Self::CustomerNotFound(msg) => (
                StatusCode::NOT_FOUND,
                "customer_not_found",
                msg.clone(),
                None,
            ),
            Self::InsufficientCredit {
                remaining,
                requested,
            } => (
                StatusCode::BAD_REQUEST,
                "insufficient_credit",
                self.to_string(),
                Some(serde_json::json!({
                    "remaining_cents": remaining,
                    "requested_cents": requested
                })),
            ),
            Self::PaymentProcessingFailed(msg) => (
                StatusCode::BAD_GATEWAY,
                "payment_processing_failed",
                msg.clone(),
                None,
            ),
            Self::WebhookSignatureInvalid => (
                StatusCode::BAD_REQUEST,
                "webhook_signature_invalid",
                self.to_string(),
                None,
            ),
            Self::UpstreamUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream_unavailable",
                msg.clone(),
                None,
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<tollgate_store::StoreError> for ApiError {
    fn from(err: tollgate_store::StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ProcessorError> for ApiError {
    fn from(err: ProcessorError) -> Self {
        match err {
            ProcessorError::Http(e) => Self::UpstreamUnavailable(e.to_string()),
            ProcessorError::Api { .. } => Self::PaymentProcessingFailed(err.to_string()),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientCredit {
                remaining,
                requested,
            } => Self::InsufficientCredit {
                remaining,
                requested,
            },
            LedgerError::InvalidAmount(msg) => Self::Validation(msg),
            LedgerError::Processor(e) => e.into(),
        }
    }
}
