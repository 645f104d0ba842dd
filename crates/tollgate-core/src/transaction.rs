//! Ledger transaction types.
//!
//! Transactions are created and stored by the payment processor; tollgate
//! only reads them back. They are immutable and append-only, and they are
//! the sole source of truth for a customer's balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CustomerRef;

/// A single entry in a customer's credit ledger.
///
/// Sign convention (matching the processor's balance transactions):
/// **negative `amount_cents` = credit granted, positive = usage debited**.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Processor-assigned transaction id (e.g. `txn_...`).
    pub id: String,

    /// The customer whose ledger this entry belongs to.
    pub customer_ref: CustomerRef,

    /// Amount in cents. Negative = credit granted, positive = debit.
    pub amount_cents: i64,

    /// Human-readable description.
    pub description: String,

    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Whether this entry granted credit to the customer.
    #[must_use]
    pub const fn is_credit_grant(&self) -> bool {
        self.amount_cents < 0
    }

    /// Whether this entry debited usage from the customer.
    #[must_use]
    pub const fn is_debit(&self) -> bool {
        self.amount_cents > 0
    }

    /// The granted amount as a positive number of cents (0 for debits).
    #[must_use]
    pub const fn granted_cents(&self) -> i64 {
        if self.amount_cents < 0 {
            -self.amount_cents
        } else {
            0
        }
    }
}
