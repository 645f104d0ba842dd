//! Customer link records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CustomerRef, PlatformUserId};

/// The locally stored link between a platform user and their processor customer.
///
/// The full customer record is owned by the payment processor; tollgate
/// keeps only this reference, created lazily on the user's first
/// interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerLink {
    /// The platform user id from the identity service.
    pub platform_user_id: PlatformUserId,

    /// The processor-assigned customer reference.
    pub customer_ref: CustomerRef,

    /// Email captured at creation time, if any.
    pub email: Option<String>,

    /// Display name captured at creation time, if any.
    pub display_name: Option<String>,

    /// When the link was created.
    pub created_at: DateTime<Utc>,
}

impl CustomerLink {
    /// Create a new link record.
    #[must_use]
    pub fn new(
        platform_user_id: PlatformUserId,
        customer_ref: CustomerRef,
        email: Option<String>,
        display_name: Option<String>,
    ) -> Self {
        Self {
            platform_user_id,
            customer_ref,
            email,
            display_name,
            created_at: Utc::now(),
        }
    }
}
