//! Customer directory.
//!
//! Customer records are owned by the payment processor; tollgate keeps only
//! a link from the platform user id to the processor's customer reference,
//! created lazily on the user's first interaction.

use tollgate_core::{CustomerLink, CustomerRef};

use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the caller's customer reference, creating the customer on first
/// contact.
///
/// First creation also grants the configured sign-up credit. A failed grant
/// is logged and not surfaced: the customer exists and can top up normally.
pub async fn get_or_create_customer(
    state: &AppState,
    identity: &CallerIdentity,
) -> Result<CustomerRef, ApiError> {
    if let Some(link) = state.store.get_customer_link(&identity.platform_user_id)? {
        return Ok(link.customer_ref);
    }

    let customer_ref = state
        .processor
        .create_customer(
            identity.platform_user_id.as_str(),
            identity.email.as_deref(),
            None,
        )
        .await?;

    let link = CustomerLink::new(
        identity.platform_user_id.clone(),
        customer_ref.clone(),
        identity.email.clone(),
        None,
    );
    state.store.put_customer_link(&link)?;

    tracing::info!(
        platform_user_id = %identity.platform_user_id,
        customer_ref = %customer_ref,
        "Customer created"
    );

    if state.config.signup_credit_cents > 0 {
        if let Err(e) = state
            .ledger
            .add_credit(
                &customer_ref,
                state.config.signup_credit_cents,
                "Sign-up credit",
            )
            .await
        {
            tracing::warn!(
                customer_ref = %customer_ref,
                error = %e,
                "Failed to grant sign-up credit"
            );
        }
    }

    Ok(customer_ref)
}
