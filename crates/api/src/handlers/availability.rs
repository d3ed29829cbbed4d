//! # Availability Handlers
//!
//! Read-only queries over free slots: the open days of a month, and
//! the free slots on a given day enriched with provider display names
//! from the profile service. Enrichment is best-effort: when the
//! lookup fails or has no match, results carry a placeholder name
//! instead of failing the query.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use slotbook_core::errors::BookingError;
use slotbook_core::models::slot::{AvailableDaysResponse, FreeSlotResponse};
use slotbook_core::profile::{ProfileLookup, UNKNOWN_PROVIDER_NAME};
use slotbook_db::store::SlotStore;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct FreeSlotsQuery {
    pub provider_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub provider_id: Uuid,
    pub year: i32,
    pub month: u32,
}

#[axum::debug_handler]
pub async fn get_free_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<FreeSlotsQuery>,
) -> Result<Json<Vec<FreeSlotResponse>>, AppError> {
    let slots = list_free_slots(
        state.slots.as_ref(),
        state.profiles.as_ref(),
        query.provider_id,
        query.date,
    )
    .await?;

    Ok(Json(slots))
}

#[axum::debug_handler]
pub async fn get_available_days(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<AvailableDaysResponse>, AppError> {
    let dates = list_available_days(
        state.slots.as_ref(),
        query.provider_id,
        query.year,
        query.month,
    )
    .await?;

    Ok(Json(AvailableDaysResponse { dates }))
}

/// Free slots for one provider on one day, ascending by start time,
/// with display names attached from one batched profile lookup over
/// the distinct provider ids in the result.
pub async fn list_free_slots(
    store: &dyn SlotStore,
    profiles: &dyn ProfileLookup,
    provider_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<FreeSlotResponse>, BookingError> {
    let day_start = date.and_time(NaiveTime::MIN).and_utc();
    let day_end = day_start + chrono::Duration::days(1);

    let slots = store
        .query_free(provider_id, day_start, day_end)
        .await
        .map_err(BookingError::Database)?;

    let mut ids: Vec<Uuid> = slots.iter().map(|slot| slot.provider_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let names = match profiles.display_names(&ids).await {
        Ok(names) => names,
        Err(err) => {
            tracing::warn!("Profile lookup failed, using placeholder names: {}", err);
            HashMap::new()
        }
    };

    Ok(slots
        .into_iter()
        .map(|slot| {
            let provider_name = names
                .get(&slot.provider_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_PROVIDER_NAME.to_string());

            FreeSlotResponse {
                id: slot.id,
                start_time: slot.start_time,
                duration_minutes: slot.duration_minutes,
                provider_id: slot.provider_id,
                provider_name,
            }
        })
        .collect())
}

/// Calendar dates of the month with at least one free slot.
pub async fn list_available_days(
    store: &dyn SlotStore,
    provider_id: Uuid,
    year: i32,
    month: u32,
) -> Result<Vec<NaiveDate>, BookingError> {
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        return Err(BookingError::Validation(format!(
            "Invalid year/month: {}-{}",
            year, month
        )));
    }

    store
        .query_free_days_in_month(provider_id, year, month)
        .await
        .map_err(BookingError::Database)
}
