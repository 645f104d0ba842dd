//! Processor wire types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use tollgate_core::{CustomerRef, Transaction};

/// Processor customer object.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    /// Customer id.
    pub id: String,
    /// Customer email.
    #[serde(default)]
    pub email: Option<String>,
    /// Invoice settings, carrying the default payment method.
    #[serde(default)]
    pub invoice_settings: Option<InvoiceSettings>,
}

/// Customer invoice settings.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceSettings {
    /// Default payment method id, if one is attached.
    #[serde(default)]
    pub default_payment_method: Option<String>,
}

/// A stored payment method.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethod {
    /// Payment method id.
    pub id: String,
}

/// A customer balance transaction as returned by the processor.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceTransaction {
    /// Transaction id (e.g. `txn_...`).
    pub id: String,
    /// Amount in cents. Negative = credit granted, positive = debit.
    pub amount: i64,
    /// Description, if one was set at creation.
    #[serde(default)]
    pub description: Option<String>,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created: i64,
}

impl BalanceTransaction {
    /// Convert the wire object into the domain transaction type.
    #[must_use]
    pub fn into_transaction(self, customer_ref: &CustomerRef) -> Transaction {
        Transaction {
            id: self.id,
            customer_ref: customer_ref.clone(),
            amount_cents: self.amount,
            description: self.description.unwrap_or_default(),
            created_at: DateTime::from_timestamp(self.created, 0).unwrap_or_else(Utc::now),
        }
    }
}

/// An off-session charge (payment intent).
#[derive(Debug, Clone, Deserialize)]
pub struct Charge {
    /// Charge id.
    pub id: String,
    /// Status (succeeded, requires_action, canceled, ...).
    #[serde(default)]
    pub status: String,
}

impl Charge {
    /// Whether the charge captured the payment.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}

/// A hosted checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Session id.
    pub id: String,
    /// Checkout URL to redirect the user to.
    #[serde(default)]
    pub url: Option<String>,
}

/// Processor list response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    /// Data items.
    pub data: Vec<T>,
    /// Whether there are more items.
    #[serde(default)]
    pub has_more: bool,
}

/// A webhook event delivered by the processor.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// Event id.
    pub id: String,
    /// Event type (e.g. "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event data.
    pub data: WebhookEventData,
}

/// Webhook event data container.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    /// The event object.
    pub object: serde_json::Value,
}

/// Processor API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// Error details.
    pub error: StripeErrorDetail,
}

/// Processor error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorDetail {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_transaction_converts_to_domain() {
        let wire = BalanceTransaction {
            id: "txn_1".into(),
            amount: -500,
            description: Some("Sign-up credit".into()),
            created: 1_700_000_000,
        };

        let customer = CustomerRef::new("cus_1");
        let tx = wire.into_transaction(&customer);

        assert_eq!(tx.id, "txn_1");
        assert_eq!(tx.amount_cents, -500);
        assert!(tx.is_credit_grant());
        assert_eq!(tx.created_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn charge_succeeded_checks_status() {
        let charge = Charge {
            id: "pi_1".into(),
            status: "succeeded".into(),
        };
        assert!(charge.succeeded());

        let pending = Charge {
            id: "pi_2".into(),
            status: "requires_action".into(),
        };
        assert!(!pending.succeeded());
    }
}
