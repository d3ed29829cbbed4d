use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use slotbook_core::errors::BookingError;
use slotbook_core::expand::expand_schedule;
use slotbook_core::models::schedule::{
    CreateScheduleRequest, CreateScheduleResponse, RecurringSchedule,
};
use slotbook_db::store::SlotStore;

use crate::{
    ApiState,
    middleware::auth::{self, CallerIdentity},
    middleware::error_handling::AppError,
};

#[axum::debug_handler]
pub async fn create_schedule(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
    Json(payload): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<CreateScheduleResponse>), AppError> {
    if caller.role != auth::PROVIDER_ROLE {
        return Err(AppError(BookingError::Authorization(
            "Only providers can create slots".to_string(),
        )));
    }

    let schedule = RecurringSchedule::from_request(caller.user_id, &payload);
    let created = create_provider_schedule(state.slots.as_ref(), &schedule).await?;

    Ok((StatusCode::CREATED, Json(CreateScheduleResponse { created })))
}

/// Expands the recurring pattern into concrete slots and persists them
/// in one all-or-nothing batch. Validation failures reject before any
/// store mutation.
pub async fn create_provider_schedule(
    store: &dyn SlotStore,
    schedule: &RecurringSchedule,
) -> Result<u64, BookingError> {
    let slots = expand_schedule(schedule)?;

    let created = store
        .insert_batch(slots)
        .await
        .map_err(BookingError::Database)?;

    tracing::info!(
        "Created {} slots for provider {}",
        created,
        schedule.provider_id
    );
    Ok(created)
}
