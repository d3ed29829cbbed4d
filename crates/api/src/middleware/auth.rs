//! # Caller Identity
//!
//! Requests reach this service through a trusted gateway that performs
//! authentication and forwards the caller's subject in plain headers.
//! This module extracts that identity; beyond type checks it is not
//! re-validated here.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use slotbook_core::errors::BookingError;
use uuid::Uuid;

use crate::middleware::error_handling::AppError;

pub const USER_ID_HEADER: &str = "X-User-ID";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// Role required to publish schedules.
pub const PROVIDER_ROLE: &str = "provider";

/// The caller as asserted by the upstream gateway.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub user_id: Uuid,
    pub role: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError(BookingError::Authentication(format!(
                    "Missing {} header",
                    USER_ID_HEADER
                )))
            })?;

        let user_id = Uuid::parse_str(raw_id).map_err(|_| {
            AppError(BookingError::Validation(format!(
                "{} must be a UUID",
                USER_ID_HEADER
            )))
        })?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Ok(CallerIdentity { user_id, role })
    }
}
