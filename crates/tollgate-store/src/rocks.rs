//! `RocksDB` storage implementation.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rocksdb::{BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, MultiThreaded, Options};

use tollgate_core::{AutoRechargeSettings, CustomerLink, CustomerRef, PlatformUserId};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn put<T: serde::Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = Self::serialize(value)?;

        self.db
            .put_cf(&cf, key, bytes)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn get<T: serde::de::DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }
}

impl Store for RocksStore {
    fn put_customer_link(&self, link: &CustomerLink) -> Result<()> {
        let key = keys::customer_link_key(&link.platform_user_id);
        self.put(cf::CUSTOMER_LINKS, &key, link)
    }

    fn get_customer_link(
        &self,
        platform_user_id: &PlatformUserId,
    ) -> Result<Option<CustomerLink>> {
        let key = keys::customer_link_key(platform_user_id);
        self.get(cf::CUSTOMER_LINKS, &key)
    }

    fn put_recharge_settings(&self, settings: &AutoRechargeSettings) -> Result<()> {
        let key = keys::recharge_settings_key(&settings.customer_ref);
        self.put(cf::RECHARGE_SETTINGS, &key, settings)
    }

    fn get_recharge_settings(
        &self,
        customer_ref: &CustomerRef,
    ) -> Result<Option<AutoRechargeSettings>> {
        let key = keys::recharge_settings_key(customer_ref);
        self.get(cf::RECHARGE_SETTINGS, &key)
    }

    fn has_processed_event(&self, event_id: &str) -> Result<bool> {
        let cf = self.cf(cf::WEBHOOK_EVENTS)?;
        let key = keys::webhook_event_key(event_id);

        let exists = self
            .db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();

        Ok(exists)
    }

    fn record_processed_event(&self, event_id: &str, processed_at: DateTime<Utc>) -> Result<()> {
        let key = keys::webhook_event_key(event_id);
        self.put(cf::WEBHOOK_EVENTS, &key, &processed_at)
    }
}
