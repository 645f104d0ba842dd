//! Per-customer serialization.
//!
//! Deduction is a check-then-act sequence against a remote ledger: read the
//! balance, then append a transaction. Two concurrent deductions for the
//! same customer could both pass the check before either write is visible,
//! so every mutating operation must hold that customer's lock for its full
//! read-check-write span. Different customers proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use tollgate_core::CustomerRef;

/// A registry of per-customer async locks.
///
/// One slot per customer ever seen; slots are never evicted.
#[derive(Debug, Default)]
pub struct CustomerLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CustomerLocks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a customer, waiting if a mutation is in flight.
    pub async fn acquire(&self, customer_ref: &CustomerRef) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            Arc::clone(
                map.entry(customer_ref.as_str().to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };

        lock.lock_owned().await
    }
}
