use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a booked session is held. Set once, at booking time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingKind {
    Online,
    Offline,
}

impl BookingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingKind::Online => "online",
            BookingKind::Offline => "offline",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(BookingKind::Online),
            "offline" => Some(BookingKind::Offline),
            _ => None,
        }
    }
}

/// A single bookable time interval owned by a provider.
///
/// `version` starts at 1 and is incremented exactly once, by the
/// conditional write that books the slot. A booked slot is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub is_booked: bool,
    pub booked_by: Option<Uuid>,
    pub booking_kind: Option<BookingKind>,
    pub version: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotRequest {
    pub kind: BookingKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotResponse {
    pub message: String,
}

/// One free slot as returned by the availability query, with the
/// provider's display name attached from the profile service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeSlotResponse {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub provider_id: Uuid,
    pub provider_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableDaysResponse {
    pub dates: Vec<NaiveDate>,
}
