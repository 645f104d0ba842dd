//! `RocksDB` storage layer for tollgate.
//!
//! The payment processor owns the ledger itself; this crate persists only
//! the state tollgate owns locally:
//!
//! - `customer_links`: platform user → processor customer reference
//! - `recharge_settings`: per-customer auto-recharge configuration
//! - `webhook_events`: processed webhook event ids, for at-least-once
//!   delivery deduplication
//!
//! # Example
//!
//! ```no_run
//! use tollgate_store::{RocksStore, Store};
//! use tollgate_core::{CustomerLink, CustomerRef, PlatformUserId};
//!
//! let store = RocksStore::open("/tmp/tollgate-db").unwrap();
//!
//! let link = CustomerLink::new(
//!     PlatformUserId::new("user-42"),
//!     CustomerRef::new("cus_1"),
//!     None,
//!     None,
//! );
//! store.put_customer_link(&link).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use chrono::{DateTime, Utc};
use tollgate_core::{AutoRechargeSettings, CustomerLink, CustomerRef, PlatformUserId};

/// The storage trait for tollgate's locally owned state.
///
/// Abstracts the storage layer so tests can substitute other backends.
pub trait Store: Send + Sync {
    // =========================================================================
    // Customer Links
    // =========================================================================

    /// Insert or update a customer link.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_customer_link(&self, link: &CustomerLink) -> Result<()>;

    /// Look up the customer link for a platform user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_customer_link(&self, platform_user_id: &PlatformUserId)
        -> Result<Option<CustomerLink>>;

    // =========================================================================
    // Auto-Recharge Settings
    // =========================================================================

    /// Insert or update a customer's auto-recharge settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_recharge_settings(&self, settings: &AutoRechargeSettings) -> Result<()>;

    /// Get a customer's auto-recharge settings, if ever configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_recharge_settings(
        &self,
        customer_ref: &CustomerRef,
    ) -> Result<Option<AutoRechargeSettings>>;

    // =========================================================================
    // Webhook Event Deduplication
    // =========================================================================

    /// Check whether a webhook event id has already been processed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn has_processed_event(&self, event_id: &str) -> Result<bool>;

    /// Record a webhook event id as processed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn record_processed_event(&self, event_id: &str, processed_at: DateTime<Utc>) -> Result<()>;
}
