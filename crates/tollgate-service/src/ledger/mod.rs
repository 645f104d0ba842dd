//! The credit ledger engine.
//!
//! Wraps the processor-owned transaction history with balance derivation,
//! credit mutation and the auto-recharge control loop. All mutations for a
//! customer are serialized through [`locks::CustomerLocks`]; balances are
//! derived fresh from the remote ledger on every read.

pub mod balance;
pub mod locks;
pub mod recharge;

use std::sync::Arc;

use tollgate_core::{Balance, CustomerRef, Transaction};
use tollgate_store::Store;

use crate::processor::{PaymentProcessor, ProcessorError};
use self::locks::CustomerLocks;

/// Errors that can occur in ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The remaining credit does not cover the requested deduction.
    #[error("insufficient credit: remaining={remaining}, requested={requested}")]
    InsufficientCredit {
        /// Remaining credit in cents.
        remaining: i64,
        /// Requested amount in cents.
        requested: i64,
    },

    /// The amount is not a positive number of cents.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A processor call failed.
    #[error(transparent)]
    Processor(#[from] ProcessorError),
}

/// The credit ledger engine.
#[derive(Clone)]
pub struct Ledger {
    processor: Arc<dyn PaymentProcessor>,
    store: Arc<dyn Store>,
    locks: Arc<CustomerLocks>,
}

impl Ledger {
    /// Create a new ledger engine.
    #[must_use]
    pub fn new(processor: Arc<dyn PaymentProcessor>, store: Arc<dyn Store>) -> Self {
        Self {
            processor,
            store,
            locks: Arc::new(CustomerLocks::new()),
        }
    }

    pub(crate) fn processor(&self) -> &dyn PaymentProcessor {
        self.processor.as_ref()
    }

    pub(crate) fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Derive the customer's current balance from their transaction history.
    ///
    /// Pure read; repeated calls without intervening mutation return
    /// identical results.
    pub async fn get_balance(&self, customer_ref: &CustomerRef) -> Result<Balance, LedgerError> {
        Ok(balance::fetch_balance(self.processor(), customer_ref).await?)
    }

    /// List the customer's most recent ledger entries, newest first.
    pub async fn list_recent(
        &self,
        customer_ref: &CustomerRef,
        limit: u32,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let page = self
            .processor
            .list_balance_transactions(customer_ref, limit, None)
            .await?;
        Ok(page.transactions)
    }

    /// Grant credit to a customer and return the recomputed balance.
    ///
    /// Records one negative-signed transaction. Used for sign-up credit,
    /// purchased top-ups and auto-recharge proceeds.
    pub async fn add_credit(
        &self,
        customer_ref: &CustomerRef,
        amount_cents: i64,
        description: &str,
    ) -> Result<Balance, LedgerError> {
        validate_amount(amount_cents)?;

        let _guard = self.locks.acquire(customer_ref).await;
        self.add_credit_locked(customer_ref, amount_cents, description)
            .await
    }

    /// Grant credit while already holding the customer's lock.
    pub(crate) async fn add_credit_locked(
        &self,
        customer_ref: &CustomerRef,
        amount_cents: i64,
        description: &str,
    ) -> Result<Balance, LedgerError> {
        self.processor
            .create_balance_transaction(customer_ref, -amount_cents, description)
            .await?;

        let balance = balance::fetch_balance(self.processor(), customer_ref).await?;

        tracing::info!(
            customer_ref = %customer_ref,
            amount_cents = %amount_cents,
            remaining_cents = %balance.remaining_cents,
            description = %description,
            "Credit granted"
        );

        Ok(balance)
    }

    /// Deduct usage from a customer and return the post-deduction balance.
    ///
    /// Refuses with [`LedgerError::InsufficientCredit`] when the remaining
    /// credit does not cover the amount. After a successful deduction the
    /// auto-recharge controller runs with the post-deduction balance; its
    /// failures are logged and swallowed, never failing the deduction that
    /// already happened.
    pub async fn deduct_credit(
        &self,
        customer_ref: &CustomerRef,
        amount_cents: i64,
        description: &str,
    ) -> Result<Balance, LedgerError> {
        validate_amount(amount_cents)?;

        let _guard = self.locks.acquire(customer_ref).await;

        let balance = balance::fetch_balance(self.processor(), customer_ref).await?;
        if !balance.has_enough(amount_cents) {
            return Err(LedgerError::InsufficientCredit {
                remaining: balance.remaining_cents,
                requested: amount_cents,
            });
        }

        self.processor
            .create_balance_transaction(customer_ref, amount_cents, description)
            .await?;

        let new_balance = balance::fetch_balance(self.processor(), customer_ref).await?;

        tracing::info!(
            customer_ref = %customer_ref,
            amount_cents = %amount_cents,
            remaining_cents = %new_balance.remaining_cents,
            "Usage deducted"
        );

        let triggered = self
            .maybe_recharge_locked(customer_ref, new_balance.remaining_cents)
            .await;
        if triggered {
            tracing::info!(customer_ref = %customer_ref, "Auto-recharge triggered by deduction");
        }

        Ok(new_balance)
    }

    /// Run the auto-recharge check for a customer.
    ///
    /// Returns whether a recharge was applied. See
    /// [`recharge`](crate::ledger::recharge) for the decision sequence.
    pub async fn maybe_recharge(
        &self,
        customer_ref: &CustomerRef,
        current_balance_cents: i64,
    ) -> bool {
        let _guard = self.locks.acquire(customer_ref).await;
        self.maybe_recharge_locked(customer_ref, current_balance_cents)
            .await
    }
}

fn validate_amount(amount_cents: i64) -> Result<(), LedgerError> {
    if amount_cents <= 0 {
        return Err(LedgerError::InvalidAmount(format!(
            "amount must be positive, got {amount_cents}"
        )));
    }
    Ok(())
}
