//! Auto-recharge settings.

use serde::{Deserialize, Serialize};

use crate::CustomerRef;

/// Default recharge trigger threshold: $5.
pub const DEFAULT_RECHARGE_THRESHOLD_CENTS: i64 = 500;

/// Default recharge amount: $10.
pub const DEFAULT_RECHARGE_CENTS: i64 = 1000;

/// Per-customer auto-recharge configuration.
///
/// When enabled, a deduction that leaves the balance at or below
/// `threshold_cents` triggers an off-session charge for `recharge_cents`.
/// Mutated only by the account owner through the settings endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoRechargeSettings {
    /// The customer these settings belong to.
    pub customer_ref: CustomerRef,

    /// Whether auto-recharge is enabled.
    pub enabled: bool,

    /// Trigger a recharge when the balance drops to or below this (in cents).
    pub threshold_cents: i64,

    /// Amount to recharge (in cents).
    pub recharge_cents: i64,
}

impl AutoRechargeSettings {
    /// The default settings for a customer that has never configured them.
    #[must_use]
    pub const fn disabled(customer_ref: CustomerRef) -> Self {
        Self {
            customer_ref,
            enabled: false,
            threshold_cents: DEFAULT_RECHARGE_THRESHOLD_CENTS,
            recharge_cents: DEFAULT_RECHARGE_CENTS,
        }
    }

    /// Whether `balance_cents` is at or below the trigger threshold.
    #[must_use]
    pub const fn should_trigger(&self, balance_cents: i64) -> bool {
        self.enabled && balance_cents <= self.threshold_cents
    }
}
