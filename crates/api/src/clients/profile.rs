//! HTTP client for the profile service.
//!
//! Availability results are enriched with provider display names read
//! through a single batched call. Failures surface as
//! [`BookingError::Enrichment`] so callers can degrade to a placeholder
//! name instead of failing the query.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use slotbook_core::errors::{BookingError, BookingResult};
use slotbook_core::profile::ProfileLookup;
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct BatchProfilesRequest<'a> {
    ids: &'a [Uuid],
}

#[derive(Debug, Deserialize)]
struct BatchProfilesResponse {
    profiles: Vec<ProfileEntry>,
}

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    id: Uuid,
    full_name: String,
}

pub struct HttpProfileLookup {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProfileLookup {
    pub fn new(base_url: impl Into<String>) -> BookingResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| BookingError::Enrichment(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn batch_url(&self) -> String {
        format!(
            "{}/internal/profiles/batch",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ProfileLookup for HttpProfileLookup {
    async fn display_names(&self, ids: &[Uuid]) -> BookingResult<HashMap<Uuid, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let response = self
            .client
            .post(self.batch_url())
            .json(&BatchProfilesRequest { ids })
            .send()
            .await
            .map_err(|err| BookingError::Enrichment(err.to_string()))?
            .error_for_status()
            .map_err(|err| BookingError::Enrichment(err.to_string()))?;

        let body: BatchProfilesResponse = response
            .json()
            .await
            .map_err(|err| BookingError::Enrichment(err.to_string()))?;

        Ok(body
            .profiles
            .into_iter()
            .map(|profile| (profile.id, profile.full_name))
            .collect())
    }
}
