//! Test doubles for [`SlotStore`]: a `mockall` mock for scripting
//! failure paths, and an in-memory store whose conditional write runs
//! under a single lock and therefore keeps the real compare-and-swap
//! semantics under concurrent callers.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use eyre::{Result, eyre};
use mockall::mock;
use slotbook_core::models::slot::{BookingKind, Slot};
use uuid::Uuid;

use crate::store::{SlotStore, month_bounds};

mock! {
    pub SlotStore {}

    #[async_trait]
    impl SlotStore for SlotStore {
        async fn insert_batch(&self, slots: Vec<Slot>) -> Result<u64>;
        async fn get_by_id(&self, id: Uuid) -> Result<Option<Slot>>;
        async fn query_free(
            &self,
            provider_id: Uuid,
            day_start: DateTime<Utc>,
            day_end: DateTime<Utc>,
        ) -> Result<Vec<Slot>>;
        async fn query_free_days_in_month(
            &self,
            provider_id: Uuid,
            year: i32,
            month: u32,
        ) -> Result<Vec<NaiveDate>>;
        async fn conditional_book(
            &self,
            id: Uuid,
            expected_version: i32,
            booked_by: Uuid,
            kind: BookingKind,
        ) -> Result<u64>;
    }
}

#[derive(Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<Uuid, Slot>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Slot>>> {
        self.slots.lock().map_err(|_| eyre!("slot map poisoned"))
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn insert_batch(&self, slots: Vec<Slot>) -> Result<u64> {
        let mut map = self.locked()?;

        for (index, slot) in slots.iter().enumerate() {
            let collides_with_existing = map.contains_key(&slot.id)
                || map.values().any(|existing| {
                    existing.provider_id == slot.provider_id
                        && existing.start_time == slot.start_time
                });
            let collides_within_batch = slots[..index].iter().any(|earlier| {
                earlier.provider_id == slot.provider_id && earlier.start_time == slot.start_time
            });

            if collides_with_existing || collides_within_batch {
                return Err(eyre!(
                    "duplicate slot for provider {} at {}",
                    slot.provider_id,
                    slot.start_time
                ));
            }
        }

        let count = slots.len() as u64;
        for slot in slots {
            map.insert(slot.id, slot);
        }
        Ok(count)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Slot>> {
        Ok(self.locked()?.get(&id).cloned())
    }

    async fn query_free(
        &self,
        provider_id: Uuid,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<Vec<Slot>> {
        let mut free: Vec<Slot> = self
            .locked()?
            .values()
            .filter(|slot| {
                slot.provider_id == provider_id
                    && !slot.is_booked
                    && slot.start_time >= day_start
                    && slot.start_time < day_end
            })
            .cloned()
            .collect();
        free.sort_by_key(|slot| slot.start_time);
        Ok(free)
    }

    async fn query_free_days_in_month(
        &self,
        provider_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<NaiveDate>> {
        let (month_start, month_end) = month_bounds(year, month)?;

        let days: BTreeSet<NaiveDate> = self
            .locked()?
            .values()
            .filter(|slot| {
                slot.provider_id == provider_id
                    && !slot.is_booked
                    && slot.start_time >= month_start
                    && slot.start_time < month_end
            })
            .map(|slot| slot.start_time.date_naive())
            .collect();

        Ok(days.into_iter().collect())
    }

    async fn conditional_book(
        &self,
        id: Uuid,
        expected_version: i32,
        booked_by: Uuid,
        kind: BookingKind,
    ) -> Result<u64> {
        let mut map = self.locked()?;

        match map.get_mut(&id) {
            Some(slot) if slot.version == expected_version => {
                slot.is_booked = true;
                slot.booked_by = Some(booked_by);
                slot.booking_kind = Some(kind);
                slot.version += 1;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}
