mod test_utils;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use slotbook_api::handlers::booking::try_book;
use slotbook_core::errors::BookingError;
use slotbook_core::models::slot::BookingKind;
use slotbook_db::mock::store::{MemorySlotStore, MockSlotStore};
use slotbook_db::store::SlotStore;
use uuid::Uuid;

use test_utils::{at, free_slot};

#[tokio::test]
async fn test_book_free_slot_succeeds() {
    let store = MemorySlotStore::new();
    let slot = free_slot(Uuid::new_v4(), at(2026, 3, 2, 9));
    let slot_id = slot.id;
    let booked_by = Uuid::new_v4();
    store.insert_batch(vec![slot]).await.unwrap();

    try_book(&store, slot_id, booked_by, BookingKind::Online)
        .await
        .expect("booking a free slot should succeed");

    let booked = store.get_by_id(slot_id).await.unwrap().unwrap();
    assert!(booked.is_booked);
    assert_eq!(booked.booked_by, Some(booked_by));
    assert_eq!(booked.booking_kind, Some(BookingKind::Online));
    assert_eq!(booked.version, 2);
}

#[tokio::test]
async fn test_book_unknown_slot_is_not_found() {
    let store = MemorySlotStore::new();

    let result = try_book(&store, Uuid::new_v4(), Uuid::new_v4(), BookingKind::Online).await;

    assert!(matches!(result, Err(BookingError::NotFound(_))));
}

#[tokio::test]
async fn test_book_already_booked_slot_is_rejected_early() {
    let store = MemorySlotStore::new();
    let slot = free_slot(Uuid::new_v4(), at(2026, 3, 2, 9));
    let slot_id = slot.id;
    store.insert_batch(vec![slot]).await.unwrap();

    try_book(&store, slot_id, Uuid::new_v4(), BookingKind::Online)
        .await
        .unwrap();

    let result = try_book(&store, slot_id, Uuid::new_v4(), BookingKind::Offline).await;

    assert!(matches!(result, Err(BookingError::AlreadyBooked)));
}

#[tokio::test]
async fn test_version_mismatch_maps_to_conflict() {
    // The slot reads as free, but the conditional write reports that
    // no row matched the observed version: someone else got there
    // between the read and the write.
    let mut store = MockSlotStore::new();
    let slot_id = Uuid::new_v4();
    let provider_id = Uuid::new_v4();

    store.expect_get_by_id().returning(move |id| {
        let mut slot = free_slot(provider_id, at(2026, 3, 2, 9));
        slot.id = id;
        Ok(Some(slot))
    });
    store.expect_conditional_book().returning(|_, _, _, _| Ok(0));

    let result = try_book(&store, slot_id, Uuid::new_v4(), BookingKind::Online).await;

    assert!(matches!(result, Err(BookingError::Conflict)));
}

#[tokio::test]
async fn test_store_failure_surfaces_as_database_error() {
    let mut store = MockSlotStore::new();
    store
        .expect_get_by_id()
        .returning(|_| Err(eyre::eyre!("connection refused")));

    let result = try_book(&store, Uuid::new_v4(), Uuid::new_v4(), BookingKind::Online).await;

    assert!(matches!(result, Err(BookingError::Database(_))));
}

#[tokio::test]
async fn test_concurrent_bookings_admit_exactly_one_winner() {
    let store = Arc::new(MemorySlotStore::new());
    let slot = free_slot(Uuid::new_v4(), at(2026, 3, 2, 9));
    let slot_id = slot.id;
    store.insert_batch(vec![slot]).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let booker = Uuid::new_v4();
            let outcome = try_book(store.as_ref(), slot_id, booker, BookingKind::Online).await;
            (booker, outcome)
        }));
    }

    let mut winners = Vec::new();
    let mut losses = 0;
    for handle in handles {
        let (booker, outcome) = handle.await.unwrap();
        match outcome {
            Ok(()) => winners.push(booker),
            Err(BookingError::AlreadyBooked) | Err(BookingError::Conflict) => losses += 1,
            Err(other) => panic!("unexpected booking failure: {:?}", other),
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(losses, 7);

    // Losers left no trace: the slot carries the winner's data and the
    // version moved exactly once.
    let booked = store.get_by_id(slot_id).await.unwrap().unwrap();
    assert!(booked.is_booked);
    assert_eq!(booked.booked_by, Some(winners[0]));
    assert_eq!(booked.version, 2);
}
