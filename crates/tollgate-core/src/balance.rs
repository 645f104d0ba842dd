//! Balance derivation from transaction history.
//!
//! A balance is never stored; it is recomputed on every read by folding
//! the customer's signed transactions.

use serde::{Deserialize, Serialize};

use crate::Transaction;

/// A customer's derived credit balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Sum of all granted credit, in cents (absolute values of negative entries).
    pub total_granted_cents: i64,

    /// Sum of all debited usage, in cents (positive entries).
    pub total_used_cents: i64,

    /// Credit still available, in cents. Granted minus used.
    pub remaining_cents: i64,
}

impl Balance {
    /// An all-zero balance (empty transaction history).
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            total_granted_cents: 0,
            total_used_cents: 0,
            remaining_cents: 0,
        }
    }

    /// Fold one transaction into the running balance.
    pub fn apply(&mut self, transaction: &Transaction) {
        if transaction.amount_cents < 0 {
            self.total_granted_cents += -transaction.amount_cents;
        } else {
            self.total_used_cents += transaction.amount_cents;
        }
        self.remaining_cents = self.total_granted_cents - self.total_used_cents;
    }

    /// Derive a balance from a transaction history.
    #[must_use]
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut balance = Self::zero();
        for tx in transactions {
            balance.apply(tx);
        }
        balance
    }

    /// Whether the remaining credit covers `amount_cents`.
    #[must_use]
    pub const fn has_enough(&self, amount_cents: i64) -> bool {
        self.remaining_cents >= amount_cents
    }
}
