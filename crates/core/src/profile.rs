//! Contract for the profile-lookup collaborator service.
//!
//! Availability queries attach provider display names fetched through
//! this trait. The lookup is best-effort: callers fall back to
//! [`UNKNOWN_PROVIDER_NAME`] when it fails or returns no match, so a
//! profile-service outage never fails an availability query.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::BookingResult;

/// Placeholder used when no display name could be resolved.
pub const UNKNOWN_PROVIDER_NAME: &str = "Unknown Provider";

/// Read-only batched access to provider display names.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// Returns a display name per id. Partial results are allowed;
    /// missing ids are simply absent from the map.
    async fn display_names(&self, ids: &[Uuid]) -> BookingResult<HashMap<Uuid, String>>;
}
