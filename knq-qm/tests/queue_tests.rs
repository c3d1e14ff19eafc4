//! Queue manager integration tests
//!
//! Covers submission positioning, promotion state transitions with dense
//! renumbering, deletion gaps, and the change events emitted for each
//! mutation.

use knq_common::db::models::{EntryStatus, QueueEntry};
use knq_common::events::{EventBus, QueueEvent};
use knq_qm::queue::QueueManager;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;

/// Create in-memory test database with schema
async fn create_test_db() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .connect("sqlite::memory:")
        .await
        .unwrap();
    knq_common::db::init_schema(&pool).await.unwrap();
    pool
}

async fn create_manager() -> (QueueManager, Arc<EventBus>) {
    let pool = create_test_db().await;
    let events = Arc::new(EventBus::new(100));
    (QueueManager::new(pool, events.clone()), events)
}

/// Submit helper with distinct singer names to stay clear of the
/// repeat-singer throttle
async fn submit(manager: &QueueManager, singer: &str, music: &str) -> QueueEntry {
    manager
        .submit(singer, "Various", music)
        .await
        .expect("submit should succeed")
        .entry
}

fn waiting_of(entries: &[QueueEntry]) -> Vec<(&str, i64)> {
    entries
        .iter()
        .filter(|e| e.status == EntryStatus::Waiting)
        .map(|e| (e.singer.as_str(), e.position))
        .collect()
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_first_submission_gets_position_1() {
    let (manager, _) = create_manager().await;

    let outcome = manager.submit("Ana", "Beatles", "Let It Be").await.unwrap();

    assert_eq!(outcome.entry.position, 1);
    assert_eq!(outcome.entry.status, EntryStatus::Waiting);
    assert!(!outcome.entry.is_playing);
    assert_eq!(outcome.in_line, 1);
}

#[tokio::test]
async fn test_submissions_append_after_max_waiting_position() {
    let (manager, _) = create_manager().await;

    submit(&manager, "Ana", "Let It Be").await;
    submit(&manager, "Bruno", "Somebody to Love").await;
    let third = manager.submit("Carla", "Skank", "Garota Nacional").await.unwrap();

    assert_eq!(third.entry.position, 3);
    assert_eq!(third.in_line, 3);
}

#[tokio::test]
async fn test_submission_fields_are_trimmed() {
    let (manager, _) = create_manager().await;

    let entry = submit(&manager, "  Ana  ", "  Let It Be  ").await;

    assert_eq!(entry.singer, "Ana");
    assert_eq!(entry.music, "Let It Be");
}

#[tokio::test]
async fn test_blank_fields_rejected_before_any_write() {
    let (manager, _) = create_manager().await;

    let err = manager.submit("   ", "Beatles", "Let It Be").await.unwrap_err();
    assert!(matches!(err, knq_common::Error::InvalidInput(_)));

    let entries = manager.list_active().await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_repeat_singer_throttled() {
    let (manager, _) = create_manager().await;

    manager.submit("Ana", "Beatles", "Let It Be").await.unwrap();
    let err = manager.submit("Ana", "Beatles", "Yesterday").await.unwrap_err();

    assert!(matches!(err, knq_common::Error::Throttled(_)));

    // Another singer goes through and clears the window for Ana
    manager.submit("Bruno", "Queen", "Somebody to Love").await.unwrap();
    manager.submit("Ana", "Beatles", "Yesterday").await.unwrap();
}

#[tokio::test]
async fn test_in_line_counts_waiting_and_playing() {
    let (manager, _) = create_manager().await;

    let first = submit(&manager, "Ana", "Let It Be").await;
    manager.promote(&first.id).await.unwrap();

    // Ana is playing; Bruno joins behind her
    let outcome = manager.submit("Bruno", "Queen", "Somebody to Love").await.unwrap();
    assert_eq!(outcome.in_line, 2);
}

// ============================================================================
// Promotion
// ============================================================================

#[tokio::test]
async fn test_promote_middle_entry_renumbers_densely() {
    let (manager, _) = create_manager().await;

    let _a = submit(&manager, "Ana", "Let It Be").await;
    let b = submit(&manager, "Bruno", "Somebody to Love").await;
    let _c = submit(&manager, "Carla", "Garota Nacional").await;

    let promoted = manager.promote(&b.id).await.unwrap();

    assert_eq!(promoted.status, EntryStatus::Playing);
    assert!(promoted.is_playing);
    assert_eq!(promoted.position, 0);

    let entries = manager.list_active().await.unwrap();
    assert_eq!(waiting_of(&entries), vec![("Ana", 1), ("Carla", 2)]);
}

#[tokio::test]
async fn test_promote_demotes_previous_playing_to_done() {
    let (manager, _) = create_manager().await;

    let d = submit(&manager, "Dora", "Evidências").await;
    let e = submit(&manager, "Enzo", "Wonderwall").await;
    submit(&manager, "Fabi", "Creep").await;

    manager.promote(&d.id).await.unwrap();
    manager.promote(&e.id).await.unwrap();

    let entries = manager.list_active().await.unwrap();

    // Dora is done and no longer listed
    assert!(entries.iter().all(|x| x.singer != "Dora"));

    // Enzo holds the mic, Fabi renumbered to the front of the waiting line
    let playing: Vec<_> = entries
        .iter()
        .filter(|x| x.status == EntryStatus::Playing)
        .collect();
    assert_eq!(playing.len(), 1);
    assert_eq!(playing[0].singer, "Enzo");
    assert_eq!(playing[0].position, 0);

    assert_eq!(waiting_of(&entries), vec![("Fabi", 1)]);
}

#[tokio::test]
async fn test_promote_unknown_id_is_not_found() {
    let (manager, _) = create_manager().await;

    let err = manager.promote("no-such-id").await.unwrap_err();
    assert!(matches!(err, knq_common::Error::NotFound(_)));
}

#[tokio::test]
async fn test_promote_rejects_non_waiting_entry() {
    let (manager, _) = create_manager().await;

    let a = submit(&manager, "Ana", "Let It Be").await;
    manager.promote(&a.id).await.unwrap();

    // Already playing: cannot be promoted again
    let err = manager.promote(&a.id).await.unwrap_err();
    assert!(matches!(err, knq_common::Error::InvalidState(_)));

    // And the failed call must not have touched the row
    let entries = manager.list_active().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, EntryStatus::Playing);
}

#[tokio::test]
async fn test_promotion_closes_gap_left_by_deletion() {
    let (manager, _) = create_manager().await;

    let _a = submit(&manager, "Ana", "Let It Be").await;
    let b = submit(&manager, "Bruno", "Somebody to Love").await;
    let _c = submit(&manager, "Carla", "Garota Nacional").await;
    let d = submit(&manager, "Dora", "Evidências").await;

    // Deleting Bruno leaves positions 1, 3, 4
    manager.remove(&b.id).await.unwrap();
    let entries = manager.list_active().await.unwrap();
    assert_eq!(
        waiting_of(&entries),
        vec![("Ana", 1), ("Carla", 3), ("Dora", 4)]
    );

    // Promotion renumbers by order, closing the gap
    manager.promote(&d.id).await.unwrap();
    let entries = manager.list_active().await.unwrap();
    assert_eq!(waiting_of(&entries), vec![("Ana", 1), ("Carla", 2)]);
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn test_remove_leaves_other_positions_untouched() {
    let (manager, _) = create_manager().await;

    let _a = submit(&manager, "Ana", "Let It Be").await;
    let b = submit(&manager, "Bruno", "Somebody to Love").await;
    let _c = submit(&manager, "Carla", "Garota Nacional").await;

    let removed = manager.remove(&b.id).await.unwrap();
    assert_eq!(removed.singer, "Bruno");

    let entries = manager.list_active().await.unwrap();
    assert_eq!(waiting_of(&entries), vec![("Ana", 1), ("Carla", 3)]);
}

#[tokio::test]
async fn test_remove_unknown_id_is_not_found() {
    let (manager, _) = create_manager().await;

    let err = manager.remove("no-such-id").await.unwrap_err();
    assert!(matches!(err, knq_common::Error::NotFound(_)));
}

// ============================================================================
// Change events
// ============================================================================

#[tokio::test]
async fn test_submit_emits_entry_inserted() {
    let (manager, events) = create_manager().await;
    let mut rx = events.subscribe();

    let entry = submit(&manager, "Ana", "Let It Be").await;

    match rx.try_recv().unwrap() {
        QueueEvent::EntryInserted { new, .. } => {
            assert_eq!(new.id, entry.id);
            assert_eq!(new.position, 1);
        }
        other => panic!("Expected EntryInserted, got {}", other.event_type()),
    }
}

#[tokio::test]
async fn test_promote_emits_updates_with_old_and_new_snapshots() {
    let (manager, events) = create_manager().await;

    let _a = submit(&manager, "Ana", "Let It Be").await;
    let b = submit(&manager, "Bruno", "Somebody to Love").await;

    let mut rx = events.subscribe();
    manager.promote(&b.id).await.unwrap();

    let mut updates = Vec::new();
    while let Ok(event) = rx.try_recv() {
        match event {
            QueueEvent::EntryUpdated { old, new, .. } => updates.push((old, new)),
            other => panic!("Expected EntryUpdated, got {}", other.event_type()),
        }
    }

    // Ana already sits at position 1, so the only update is Bruno's promotion
    assert_eq!(updates.len(), 1);
    let (old, new) = &updates[0];
    assert_eq!(old.id, b.id);
    assert_eq!(old.status, EntryStatus::Waiting);
    assert_eq!(new.status, EntryStatus::Playing);
    assert_eq!(new.position, 0);
}

#[tokio::test]
async fn test_remove_emits_entry_deleted_with_old_snapshot() {
    let (manager, events) = create_manager().await;

    let a = submit(&manager, "Ana", "Let It Be").await;

    let mut rx = events.subscribe();
    manager.remove(&a.id).await.unwrap();

    match rx.try_recv().unwrap() {
        QueueEvent::EntryDeleted { old, .. } => {
            assert_eq!(old.id, a.id);
            assert_eq!(old.singer, "Ana");
        }
        other => panic!("Expected EntryDeleted, got {}", other.event_type()),
    }
}
