//! # Booking Handlers
//!
//! Booking is arbitrated without locks. A slot carries a version
//! counter that only ever changes when the slot is booked, and the
//! store exposes a single conditional write guarded by that counter.
//! However many callers observe the same slot as free, the guard lets
//! at most one of their writes land; everyone else gets a conflict.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use slotbook_core::errors::BookingError;
use slotbook_core::models::slot::{BookSlotRequest, BookSlotResponse, BookingKind};
use slotbook_db::store::SlotStore;
use uuid::Uuid;

use crate::{ApiState, middleware::auth::CallerIdentity, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookSlotRequest>,
) -> Result<Json<BookSlotResponse>, AppError> {
    try_book(state.slots.as_ref(), id, caller.user_id, payload.kind).await?;

    Ok(Json(BookSlotResponse {
        message: "booked".to_string(),
    }))
}

/// Attempts to book a slot for `booked_by`.
///
/// 1. Read the slot. A plain read, no locks.
/// 2. Reject early if it is already booked. This is only a cheap
///    short-circuit: two callers can both pass it for the same slot.
/// 3. Issue the conditional write with the version observed in step 1.
///    Zero rows affected means another booking committed in between;
///    the slot is gone and the caller should re-fetch availability
///    rather than retry.
pub async fn try_book(
    store: &dyn SlotStore,
    slot_id: Uuid,
    booked_by: Uuid,
    kind: BookingKind,
) -> Result<(), BookingError> {
    let slot = store
        .get_by_id(slot_id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Slot with ID {} not found", slot_id)))?;

    if slot.is_booked {
        return Err(BookingError::AlreadyBooked);
    }

    let rows = store
        .conditional_book(slot_id, slot.version, booked_by, kind)
        .await
        .map_err(BookingError::Database)?;

    if rows == 0 {
        return Err(BookingError::Conflict);
    }

    tracing::info!("Slot {} booked by {}", slot_id, booked_by);
    Ok(())
}
