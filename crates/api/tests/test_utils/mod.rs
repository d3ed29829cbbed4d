#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use slotbook_api::ApiState;
use slotbook_core::errors::{BookingError, BookingResult};
use slotbook_core::models::slot::Slot;
use slotbook_core::profile::ProfileLookup;
use slotbook_db::mock::store::MemorySlotStore;
use uuid::Uuid;

pub fn at(y: i32, m: u32, d: u32, hour: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc()
}

pub fn free_slot(provider_id: Uuid, start_time: DateTime<Utc>) -> Slot {
    Slot {
        id: Uuid::new_v4(),
        provider_id,
        start_time,
        duration_minutes: 50,
        is_booked: false,
        booked_by: None,
        booking_kind: None,
        version: 1,
    }
}

/// Profile lookup backed by a fixed name table.
pub struct StaticProfileLookup {
    names: HashMap<Uuid, String>,
}

impl StaticProfileLookup {
    pub fn with_name(id: Uuid, name: &str) -> Self {
        Self {
            names: HashMap::from([(id, name.to_string())]),
        }
    }

    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
        }
    }
}

#[async_trait]
impl ProfileLookup for StaticProfileLookup {
    async fn display_names(&self, ids: &[Uuid]) -> BookingResult<HashMap<Uuid, String>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.names.get(id).map(|name| (*id, name.clone())))
            .collect())
    }
}

/// Profile lookup that always fails, as during an outage.
pub struct FailingProfileLookup;

#[async_trait]
impl ProfileLookup for FailingProfileLookup {
    async fn display_names(&self, _ids: &[Uuid]) -> BookingResult<HashMap<Uuid, String>> {
        Err(BookingError::Enrichment(
            "profile service unreachable".to_string(),
        ))
    }
}

pub fn state_with(
    store: Arc<MemorySlotStore>,
    profiles: Arc<dyn ProfileLookup>,
) -> Arc<ApiState> {
    Arc::new(ApiState {
        slots: store,
        profiles,
    })
}
