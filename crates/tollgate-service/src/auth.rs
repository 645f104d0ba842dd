//! Caller identity extraction.
//!
//! Authentication itself is owned by the platform gateway, which validates
//! the caller and injects identity headers before requests reach tollgate.
//! This module only reads those headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::str::FromStr;

use tollgate_core::PlatformUserId;

use crate::error::ApiError;

/// Header carrying the authenticated platform user id.
pub const USER_ID_HEADER: &str = "x-platform-user-id";

/// Header carrying the caller's email, when the gateway knows it.
pub const USER_EMAIL_HEADER: &str = "x-platform-user-email";

/// The authenticated caller, extracted from gateway-injected headers.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    /// The platform user id.
    pub platform_user_id: PlatformUserId,

    /// The caller's email, if the gateway supplied one.
    pub email: Option<String>,
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user_id = parts
                .headers
                .get(USER_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::AuthenticationRequired)?;

            let platform_user_id =
                PlatformUserId::from_str(user_id).map_err(|_| ApiError::AuthenticationRequired)?;

            let email = parts
                .headers
                .get(USER_EMAIL_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            Ok(CallerIdentity {
                platform_user_id,
                email,
            })
        })
    }
}
