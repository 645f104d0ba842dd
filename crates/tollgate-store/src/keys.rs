//! Key encoding utilities for `RocksDB`.
//!
//! All tollgate keys are external string identifiers, stored as their UTF-8
//! bytes.

use tollgate_core::{CustomerRef, PlatformUserId};

/// Create a customer link key from a platform user id.
#[must_use]
pub fn customer_link_key(platform_user_id: &PlatformUserId) -> Vec<u8> {
    platform_user_id.as_str().as_bytes().to_vec()
}

/// Create a recharge settings key from a customer reference.
#[must_use]
pub fn recharge_settings_key(customer_ref: &CustomerRef) -> Vec<u8> {
    customer_ref.as_str().as_bytes().to_vec()
}

/// Create a webhook event key from an event id.
#[must_use]
pub fn webhook_event_key(event_id: &str) -> Vec<u8> {
    event_id.as_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_utf8_bytes() {
        let user = PlatformUserId::new("user-42");
        assert_eq!(customer_link_key(&user), b"user-42".to_vec());

        let customer = CustomerRef::new("cus_abc");
        assert_eq!(recharge_settings_key(&customer), b"cus_abc".to_vec());

        assert_eq!(webhook_event_key("evt_1"), b"evt_1".to_vec());
    }
}
