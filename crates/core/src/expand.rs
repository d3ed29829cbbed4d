//! Expansion of a recurring weekly pattern into concrete slots.
//!
//! Pure: no clock reads and no I/O beyond fresh id generation. Emission
//! order is deterministic: ascending date, then the input order of the
//! start times within each date.

use chrono::{Datelike, NaiveTime};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::schedule::{DEFAULT_SLOT_MINUTES, RecurringSchedule};
use crate::models::slot::Slot;

const TIME_OF_DAY_FORMAT: &str = "%H:%M";

/// Expands `schedule` into one candidate slot per defined start time on
/// every matching calendar date in `[start_date, end_date]`.
///
/// A malformed "HH:MM" string drops only that single slot instance. An
/// inverted date range, a negative duration, or an empty candidate set
/// are validation errors.
pub fn expand_schedule(schedule: &RecurringSchedule) -> BookingResult<Vec<Slot>> {
    if schedule.start_date > schedule.end_date {
        return Err(BookingError::Validation(
            "start_date must not be after end_date".to_string(),
        ));
    }
    if schedule.duration_minutes < 0 {
        return Err(BookingError::Validation(
            "duration_minutes must be positive".to_string(),
        ));
    }

    let duration_minutes = if schedule.duration_minutes == 0 {
        DEFAULT_SLOT_MINUTES
    } else {
        schedule.duration_minutes
    };

    let mut slots = Vec::new();
    let mut date = schedule.start_date;
    loop {
        let weekday = date.weekday().num_days_from_sunday() as u8;
        if let Some(times) = schedule.weekday_times.get(&weekday) {
            for raw in times {
                // Skip malformed time strings; the rest of the day stands.
                let Ok(time) = NaiveTime::parse_from_str(raw, TIME_OF_DAY_FORMAT) else {
                    continue;
                };

                slots.push(Slot {
                    id: Uuid::new_v4(),
                    provider_id: schedule.provider_id,
                    start_time: date.and_time(time).and_utc(),
                    duration_minutes,
                    is_booked: false,
                    booked_by: None,
                    booking_kind: None,
                    version: 1,
                });
            }
        }

        if date == schedule.end_date {
            break;
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    if slots.is_empty() {
        return Err(BookingError::Validation(
            "No slots produced. Check your dates and schedule.".to_string(),
        ));
    }

    Ok(slots)
}
