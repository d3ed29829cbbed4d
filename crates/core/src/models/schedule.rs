use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Slot length used when a schedule does not specify one.
pub const DEFAULT_SLOT_MINUTES: i32 = 50;

/// Start times for one weekday, 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekdayTimes {
    pub day_of_week: u8,
    pub start_times: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_minutes: Option<i32>,
    pub schedule: Vec<WeekdayTimes>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleResponse {
    pub created: u64,
}

/// A recurring weekly availability pattern over an inclusive date
/// range. Not persisted; expanded into concrete slots on creation.
#[derive(Debug, Clone)]
pub struct RecurringSchedule {
    pub provider_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Zero or negative means "use the default".
    pub duration_minutes: i32,
    /// Weekday (0 = Sunday .. 6 = Saturday) to "HH:MM" start times.
    pub weekday_times: HashMap<u8, Vec<String>>,
}

impl RecurringSchedule {
    pub fn from_request(provider_id: Uuid, request: &CreateScheduleRequest) -> Self {
        let mut weekday_times: HashMap<u8, Vec<String>> = HashMap::new();
        for day in &request.schedule {
            weekday_times
                .entry(day.day_of_week)
                .or_default()
                .extend(day.start_times.iter().cloned());
        }

        Self {
            provider_id,
            start_date: request.start_date,
            end_date: request.end_date,
            duration_minutes: request.duration_minutes.unwrap_or(0),
            weekday_times,
        }
    }
}
