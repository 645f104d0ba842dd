//! The auto-recharge control loop.
//!
//! Invoked after every deduction with the post-deduction balance. Nothing
//! here is persisted between invocations: a declined card simply causes
//! another benign attempt on the next deduction that lands at or below the
//! threshold, until the balance recovers or auto-recharge is disabled.

use tollgate_core::CustomerRef;
use uuid::Uuid;

use super::Ledger;

impl Ledger {
    /// Run the recharge check while already holding the customer's lock.
    ///
    /// Returns `true` only when a charge succeeded and the credit was
    /// recorded. Every failure path recovers locally: the triggering
    /// deduction has already been written and must not be affected.
    pub(crate) async fn maybe_recharge_locked(
        &self,
        customer_ref: &CustomerRef,
        current_balance_cents: i64,
    ) -> bool {
        let settings = match self.store().get_recharge_settings(customer_ref) {
            Ok(Some(settings)) => settings,
            // Never configured means disabled.
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(
                    customer_ref = %customer_ref,
                    error = %e,
                    "Could not load auto-recharge settings"
                );
                return false;
            }
        };

        if !settings.should_trigger(current_balance_cents) {
            return false;
        }

        let payment_method = match self.processor().get_default_payment_method(customer_ref).await
        {
            Ok(Some(payment_method)) => payment_method,
            Ok(None) => {
                tracing::info!(
                    customer_ref = %customer_ref,
                    "Auto-recharge skipped: no default payment method"
                );
                return false;
            }
            Err(e) => {
                tracing::warn!(
                    customer_ref = %customer_ref,
                    error = %e,
                    "Auto-recharge skipped: payment method lookup failed"
                );
                return false;
            }
        };

        let idempotency_key = Uuid::new_v4().to_string();

        let charge = match self
            .processor()
            .create_charge(
                customer_ref,
                &payment_method,
                settings.recharge_cents,
                &idempotency_key,
            )
            .await
        {
            Ok(charge) if charge.succeeded() => charge,
            Ok(charge) => {
                tracing::warn!(
                    customer_ref = %customer_ref,
                    charge_id = %charge.id,
                    status = %charge.status,
                    "Auto-recharge charge did not succeed"
                );
                return false;
            }
            Err(e) => {
                tracing::warn!(
                    customer_ref = %customer_ref,
                    amount_cents = %settings.recharge_cents,
                    error = %e,
                    "Auto-recharge charge failed"
                );
                return false;
            }
        };

        match self
            .add_credit_locked(customer_ref, settings.recharge_cents, "Automatic recharge")
            .await
        {
            Ok(balance) => {
                tracing::info!(
                    customer_ref = %customer_ref,
                    charge_id = %charge.id,
                    amount_cents = %settings.recharge_cents,
                    remaining_cents = %balance.remaining_cents,
                    "Auto-recharge applied"
                );
                true
            }
            Err(e) => {
                // Charge captured without a matching grant; needs operator
                // reconciliation against the processor's charge record.
                tracing::error!(
                    customer_ref = %customer_ref,
                    charge_id = %charge.id,
                    error = %e,
                    "Auto-recharge charge succeeded but credit was not recorded"
                );
                false
            }
        }
    }
}
