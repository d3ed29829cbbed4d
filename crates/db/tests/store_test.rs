use chrono::{DateTime, NaiveDate, Utc};
use pretty_assertions::assert_eq;
use slotbook_core::models::slot::{BookingKind, Slot};
use slotbook_db::mock::store::MemorySlotStore;
use slotbook_db::store::SlotStore;
use uuid::Uuid;

fn at(y: i32, m: u32, d: u32, hour: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc()
}

fn free_slot(provider_id: Uuid, start_time: DateTime<Utc>) -> Slot {
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

#[tokio::test]
async fn test_insert_batch_and_get_by_id() {
    let store = MemorySlotStore::new();
    let provider_id = Uuid::new_v4();
    let slot = free_slot(provider_id, at(2026, 3, 2, 9));
    let slot_id = slot.id;

    let inserted = store.insert_batch(vec![slot]).await.unwrap();
    assert_eq!(inserted, 1);

    let fetched = store.get_by_id(slot_id).await.unwrap().unwrap();
    assert_eq!(fetched.provider_id, provider_id);
    assert_eq!(fetched.version, 1);
    assert!(!fetched.is_booked);

    assert!(store.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_insert_batch_rejects_duplicate_instant_atomically() {
    let store = MemorySlotStore::new();
    let provider_id = Uuid::new_v4();

    store
        .insert_batch(vec![free_slot(provider_id, at(2026, 3, 2, 9))])
        .await
        .unwrap();

    // Second slot collides with the stored one; the first must not land.
    let result = store
        .insert_batch(vec![
            free_slot(provider_id, at(2026, 3, 2, 10)),
            free_slot(provider_id, at(2026, 3, 2, 9)),
        ])
        .await;
    assert!(result.is_err());

    let free = store
        .query_free(provider_id, at(2026, 3, 2, 0), at(2026, 3, 3, 0))
        .await
        .unwrap();
    assert_eq!(free.len(), 1);
    assert_eq!(free[0].start_time, at(2026, 3, 2, 9));
}

#[tokio::test]
async fn test_insert_batch_rejects_duplicates_within_batch() {
    let store = MemorySlotStore::new();
    let provider_id = Uuid::new_v4();

    let result = store
        .insert_batch(vec![
            free_slot(provider_id, at(2026, 3, 2, 9)),
            free_slot(provider_id, at(2026, 3, 2, 9)),
        ])
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_query_free_filters_and_orders() {
    let store = MemorySlotStore::new();
    let provider_id = Uuid::new_v4();
    let other_provider = Uuid::new_v4();

    let late = free_slot(provider_id, at(2026, 3, 2, 15));
    let early = free_slot(provider_id, at(2026, 3, 2, 9));
    let mut booked = free_slot(provider_id, at(2026, 3, 2, 11));
    booked.is_booked = true;
    booked.booked_by = Some(Uuid::new_v4());
    booked.booking_kind = Some(BookingKind::Online);
    booked.version = 2;
    let next_day = free_slot(provider_id, at(2026, 3, 3, 9));
    let foreign = free_slot(other_provider, at(2026, 3, 2, 10));

    store
        .insert_batch(vec![late, early, booked, next_day, foreign])
        .await
        .unwrap();

    let free = store
        .query_free(provider_id, at(2026, 3, 2, 0), at(2026, 3, 3, 0))
        .await
        .unwrap();

    assert_eq!(free.len(), 2);
    assert_eq!(free[0].start_time, at(2026, 3, 2, 9));
    assert_eq!(free[1].start_time, at(2026, 3, 2, 15));
}

#[tokio::test]
async fn test_query_free_days_in_month() {
    let store = MemorySlotStore::new();
    let provider_id = Uuid::new_v4();

    let mut booked = free_slot(provider_id, at(2026, 3, 10, 9));
    booked.is_booked = true;
    booked.version = 2;

    store
        .insert_batch(vec![
            free_slot(provider_id, at(2026, 3, 2, 9)),
            free_slot(provider_id, at(2026, 3, 2, 10)),
            free_slot(provider_id, at(2026, 3, 20, 9)),
            booked,
            // Outside the queried month.
            free_slot(provider_id, at(2026, 4, 1, 9)),
        ])
        .await
        .unwrap();

    let days = store
        .query_free_days_in_month(provider_id, 2026, 3)
        .await
        .unwrap();

    assert_eq!(
        days,
        vec![
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
        ]
    );
}

#[tokio::test]
async fn test_query_free_days_rejects_invalid_month() {
    let store = MemorySlotStore::new();

    let result = store
        .query_free_days_in_month(Uuid::new_v4(), 2026, 13)
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_conditional_book_happy_path() {
    let store = MemorySlotStore::new();
    let provider_id = Uuid::new_v4();
    let slot = free_slot(provider_id, at(2026, 3, 2, 9));
    let slot_id = slot.id;
    let booked_by = Uuid::new_v4();

    store.insert_batch(vec![slot]).await.unwrap();

    let rows = store
        .conditional_book(slot_id, 1, booked_by, BookingKind::Online)
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let booked = store.get_by_id(slot_id).await.unwrap().unwrap();
    assert!(booked.is_booked);
    assert_eq!(booked.booked_by, Some(booked_by));
    assert_eq!(booked.booking_kind, Some(BookingKind::Online));
    assert_eq!(booked.version, 2);
}

#[tokio::test]
async fn test_conditional_book_stale_version_is_a_no_op() {
    let store = MemorySlotStore::new();
    let slot = free_slot(Uuid::new_v4(), at(2026, 3, 2, 9));
    let slot_id = slot.id;
    let winner = Uuid::new_v4();
    let loser = Uuid::new_v4();

    store.insert_batch(vec![slot]).await.unwrap();

    let rows = store
        .conditional_book(slot_id, 1, winner, BookingKind::Online)
        .await
        .unwrap();
    assert_eq!(rows, 1);

    // Loser still holds the pre-booking version.
    let rows = store
        .conditional_book(slot_id, 1, loser, BookingKind::Offline)
        .await
        .unwrap();
    assert_eq!(rows, 0);

    let stored = store.get_by_id(slot_id).await.unwrap().unwrap();
    assert_eq!(stored.booked_by, Some(winner));
    assert_eq!(stored.booking_kind, Some(BookingKind::Online));
    assert_eq!(stored.version, 2);
}

#[tokio::test]
async fn test_conditional_book_unknown_id_affects_no_rows() {
    let store = MemorySlotStore::new();

    let rows = store
        .conditional_book(Uuid::new_v4(), 1, Uuid::new_v4(), BookingKind::Online)
        .await
        .unwrap();

    assert_eq!(rows, 0);
}
