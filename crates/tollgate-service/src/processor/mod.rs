//! Payment processor abstraction.
//!
//! The processor owns customers, the balance-transaction ledger, charges
//! and hosted checkout sessions. Tollgate talks to it through the
//! [`PaymentProcessor`] trait; [`stripe::StripeClient`] is the production
//! implementation and tests substitute an in-memory one.

pub mod signature;
pub mod stripe;
pub mod types;

use async_trait::async_trait;

use tollgate_core::{CustomerRef, Transaction};

pub use stripe::StripeClient;
pub use types::{Charge, CheckoutSession};

/// Error type for processor operations.
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    /// HTTP request failed (timeout, connection, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The processor API returned an error.
    #[error("processor API error: {error_type} - {message}")]
    Api {
        /// Error type.
        error_type: String,
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
    },
}

/// One page of a customer's balance-transaction history.
#[derive(Debug, Clone)]
pub struct TransactionPage {
    /// Transactions in this page, newest first.
    pub transactions: Vec<Transaction>,

    /// Whether more transactions exist beyond this page.
    pub has_more: bool,
}

/// The payment processor operations tollgate depends on.
///
/// All calls suspend on network I/O and carry the client's bounded timeout.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a customer, carrying the platform user id as metadata.
    async fn create_customer(
        &self,
        platform_user_id: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<CustomerRef, ProcessorError>;

    /// Append a signed balance transaction to a customer's ledger.
    ///
    /// Negative `amount_cents` grants credit; positive debits usage.
    async fn create_balance_transaction(
        &self,
        customer_ref: &CustomerRef,
        amount_cents: i64,
        description: &str,
    ) -> Result<Transaction, ProcessorError>;

    /// List a customer's balance transactions, newest first.
    ///
    /// `starting_after` is the id of the last transaction of the previous
    /// page; `None` starts from the newest.
    async fn list_balance_transactions(
        &self,
        customer_ref: &CustomerRef,
        limit: u32,
        starting_after: Option<&str>,
    ) -> Result<TransactionPage, ProcessorError>;

    /// Resolve the customer's default payment method, if any.
    async fn get_default_payment_method(
        &self,
        customer_ref: &CustomerRef,
    ) -> Result<Option<String>, ProcessorError>;

    /// Attempt an off-session charge against a stored payment method.
    ///
    /// The idempotency key makes a retried create apply at most once.
    async fn create_charge(
        &self,
        customer_ref: &CustomerRef,
        payment_method: &str,
        amount_cents: i64,
        idempotency_key: &str,
    ) -> Result<Charge, ProcessorError>;

    /// Create a hosted checkout session for a credit top-up.
    ///
    /// The session metadata carries `{ customer_ref, purpose: "add_credit",
    /// amount_cents }` so the completion webhook can reconcile it.
    async fn create_checkout_session(
        &self,
        customer_ref: &CustomerRef,
        amount_cents: i64,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, ProcessorError>;
}
