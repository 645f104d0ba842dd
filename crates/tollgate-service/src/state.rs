//! Application state.

use std::sync::Arc;

use tollgate_store::Store;

use crate::config::ServiceConfig;
use crate::ledger::Ledger;
use crate::processor::PaymentProcessor;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend for locally owned state.
    pub store: Arc<dyn Store>,

    /// The payment processor that owns the ledger.
    pub processor: Arc<dyn PaymentProcessor>,

    /// The credit ledger engine.
    pub ledger: Ledger,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        processor: Arc<dyn PaymentProcessor>,
        config: ServiceConfig,
    ) -> Self {
        let ledger = Ledger::new(Arc::clone(&processor), Arc::clone(&store));

        Self {
            store,
            processor,
            ledger,
            config,
        }
    }
}
