//! Database schema definitions and column families.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Customer links, keyed by `platform_user_id`.
    pub const CUSTOMER_LINKS: &str = "customer_links";

    /// Auto-recharge settings, keyed by `customer_ref`.
    pub const RECHARGE_SETTINGS: &str = "recharge_settings";

    /// Processed webhook event ids, keyed by `event_id`.
    /// Value is the processing timestamp.
    pub const WEBHOOK_EVENTS: &str = "webhook_events";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::CUSTOMER_LINKS, cf::RECHARGE_SETTINGS, cf::WEBHOOK_EVENTS]
}
