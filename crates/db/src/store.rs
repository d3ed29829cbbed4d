//! Slot storage contract and its PostgreSQL implementation.
//!
//! `conditional_book` is the only mutation that touches a slot after
//! insert. It is a single version-guarded UPDATE, so every booking race
//! resolves at the database and at most one caller wins.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::{Result, eyre};
use slotbook_core::models::slot::{BookingKind, Slot};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::DbSlot;

#[async_trait]
pub trait SlotStore: Send + Sync {
    /// All-or-nothing bulk insert. Fails the whole batch if any row
    /// collides with an existing `(provider_id, start_time)` or id.
    async fn insert_batch(&self, slots: Vec<Slot>) -> Result<u64>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Slot>>;

    /// Free slots for a provider in `[day_start, day_end)`, ascending
    /// by start time.
    async fn query_free(
        &self,
        provider_id: Uuid,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<Vec<Slot>>;

    /// Calendar dates in the given month with at least one free slot.
    async fn query_free_days_in_month(
        &self,
        provider_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<NaiveDate>>;

    /// Books the slot iff its stored version still equals
    /// `expected_version`, incrementing the version in the same write.
    /// Returns the number of rows affected: 1 on success, 0 when the
    /// guard did not match (booked in the meantime, or unknown id).
    async fn conditional_book(
        &self,
        id: Uuid,
        expected_version: i32,
        booked_by: Uuid,
        kind: BookingKind,
    ) -> Result<u64>;
}

/// UTC bounds `[first of month, first of next month)`.
pub fn month_bounds(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| eyre!("invalid year/month: {}-{}", year, month))?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| eyre!("invalid year/month: {}-{}", year, month))?;

    Ok((
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(NaiveTime::MIN).and_utc(),
    ))
}

pub struct PgSlotStore {
    pool: Pool<Postgres>,
}

impl PgSlotStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotStore for PgSlotStore {
    async fn insert_batch(&self, slots: Vec<Slot>) -> Result<u64> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for slot in &slots {
            sqlx::query(
                r#"
                INSERT INTO slots (id, provider_id, start_time, duration_minutes,
                                   is_booked, booked_by, booking_kind, version, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(slot.id)
            .bind(slot.provider_id)
            .bind(slot.start_time)
            .bind(slot.duration_minutes)
            .bind(slot.is_booked)
            .bind(slot.booked_by)
            .bind(slot.booking_kind.map(|k| k.as_str()))
            .bind(slot.version)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!("Inserted batch of {} slots", slots.len());
        Ok(slots.len() as u64)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Slot>> {
        let row = sqlx::query_as::<_, DbSlot>(
            r#"
            SELECT id, provider_id, start_time, duration_minutes,
                   is_booked, booked_by, booking_kind, version, created_at
            FROM slots
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Slot::from))
    }

    async fn query_free(
        &self,
        provider_id: Uuid,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<Vec<Slot>> {
        let rows = sqlx::query_as::<_, DbSlot>(
            r#"
            SELECT id, provider_id, start_time, duration_minutes,
                   is_booked, booked_by, booking_kind, version, created_at
            FROM slots
            WHERE provider_id = $1
              AND is_booked = FALSE
              AND start_time >= $2 AND start_time < $3
            ORDER BY start_time ASC
            "#,
        )
        .bind(provider_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Slot::from).collect())
    }

    async fn query_free_days_in_month(
        &self,
        provider_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<NaiveDate>> {
        let (month_start, month_end) = month_bounds(year, month)?;

        let days = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT DISTINCT (start_time AT TIME ZONE 'UTC')::date AS day
            FROM slots
            WHERE provider_id = $1
              AND is_booked = FALSE
              AND start_time >= $2 AND start_time < $3
            ORDER BY day ASC
            "#,
        )
        .bind(provider_id)
        .bind(month_start)
        .bind(month_end)
        .fetch_all(&self.pool)
        .await?;

        Ok(days)
    }

    async fn conditional_book(
        &self,
        id: Uuid,
        expected_version: i32,
        booked_by: Uuid,
        kind: BookingKind,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE slots
            SET is_booked = TRUE,
                booked_by = $3,
                booking_kind = $4,
                version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(id)
        .bind(expected_version)
        .bind(booked_by)
        .bind(kind.as_str())
        .execute(&self.pool)
        .await?;

        let rows = result.rows_affected();
        tracing::debug!(
            "Conditional booking of slot {} at version {}: {} row(s) affected",
            id,
            expected_version,
            rows
        );
        Ok(rows)
    }
}
