use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slotbook_core::models::slot::{BookingKind, Slot};
use sqlx::FromRow;
use uuid::Uuid;

/// A slot row as stored. `created_at` is stamped by the store at insert
/// time; `booking_kind` is kept as text in the row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub is_booked: bool,
    pub booked_by: Option<Uuid>,
    pub booking_kind: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl From<DbSlot> for Slot {
    fn from(row: DbSlot) -> Self {
        Slot {
            id: row.id,
            provider_id: row.provider_id,
            start_time: row.start_time,
            duration_minutes: row.duration_minutes,
            is_booked: row.is_booked,
            booked_by: row.booked_by,
            booking_kind: row.booking_kind.as_deref().and_then(BookingKind::parse),
            version: row.version,
        }
    }
}
