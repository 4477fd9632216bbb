//! Flush and Recovery Tests
//!
//! Exercises the persistence path end to end:
//! - A flushed store reloads with identical contents
//! - A failed flush rolls back and merges the batch back, losing
//!   nothing
//! - Per-id event order survives the flush
//! - Shutdown drains every pending write
//! - The id allocator is seeded from disk on startup

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use tempfile::TempDir;

use notedb::store::{Note, NoteStore};

// =============================================================================
// Test Utilities
// =============================================================================

const IDLE_FLUSH: Duration = Duration::from_secs(3600);

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("notes.sqlite")
}

async fn open_store(dir: &TempDir) -> NoteStore {
    NoteStore::open(db_path(dir), IDLE_FLUSH)
        .await
        .expect("Failed to open store")
}

/// Count rows through a separate connection, bypassing the store.
fn row_count(path: &Path) -> i64 {
    let conn = Connection::open(path).unwrap();
    conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
        .unwrap()
}

fn read_row(path: &Path, id: i64) -> Option<(String, String)> {
    let conn = Connection::open(path).unwrap();
    conn.query_row(
        "SELECT title, content FROM notes WHERE id = ?1",
        [id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .ok()
}

/// Triggers live in the schema, so a trigger installed through one
/// connection rejects inserts from every connection on the file.
fn install_reject_trigger(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_boom BEFORE INSERT ON notes
         WHEN NEW.title = 'boom'
         BEGIN SELECT RAISE(ABORT, 'rejected by trigger'); END",
    )
    .unwrap();
}

fn drop_reject_trigger(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch("DROP TRIGGER reject_boom").unwrap();
}

// =============================================================================
// Round Trips
// =============================================================================

#[tokio::test]
async fn test_flush_then_reload_round_trip() {
    let dir = TempDir::new().unwrap();

    let store = open_store(&dir).await;
    store.create("A", "1").unwrap();
    store.create("B", "2").unwrap();
    store.edit(2, "B2", "22").unwrap();

    store.flush().await.unwrap();
    assert_eq!(store.pending_events().unwrap(), 0);
    store.close().await.unwrap();
    drop(store);

    let reloaded = open_store(&dir).await;
    let notes = reloaded.range(0, 10).unwrap();
    assert_eq!(
        notes,
        vec![Note::new(1, "A", "1"), Note::new(2, "B2", "22")]
    );
    reloaded.close().await.unwrap();
}

#[tokio::test]
async fn test_empty_flush_is_noop() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    store.flush().await.unwrap();

    // An empty cycle does not count as a flush
    assert_eq!(store.metrics().snapshot().flush_cycles, 0);
}

#[tokio::test]
async fn test_close_flushes_remaining_writes() {
    let dir = TempDir::new().unwrap();

    let store = open_store(&dir).await;
    store.create("held", "until close").unwrap();
    assert_eq!(row_count(&db_path(&dir)), 0);

    store.close().await.unwrap();
    drop(store);

    assert_eq!(
        read_row(&db_path(&dir), 1),
        Some(("held".to_string(), "until close".to_string()))
    );
}

// =============================================================================
// Failed Flushes
// =============================================================================

#[tokio::test]
async fn test_flush_failure_requeues_batch() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    install_reject_trigger(&db_path(&dir));

    store.create("keep", "k").unwrap();
    store.create("boom", "b").unwrap();

    assert!(store.flush().await.is_err());

    // The transaction rolled back as a unit
    assert_eq!(row_count(&db_path(&dir)), 0);

    // Memory never noticed the failure
    assert_eq!(store.get(1).unwrap().unwrap().title, "keep");
    assert_eq!(store.get(2).unwrap().unwrap().title, "boom");
    assert_eq!(store.pending_events().unwrap(), 2);
    assert_eq!(store.metrics().snapshot().flush_failures, 1);

    // Once the obstacle clears, the requeued batch lands whole
    drop_reject_trigger(&db_path(&dir));
    store.flush().await.unwrap();

    assert_eq!(store.pending_events().unwrap(), 0);
    assert_eq!(row_count(&db_path(&dir)), 2);
    assert_eq!(
        read_row(&db_path(&dir), 2),
        Some(("boom".to_string(), "b".to_string()))
    );
}

#[tokio::test]
async fn test_writes_during_failed_flush_stay_ordered() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    install_reject_trigger(&db_path(&dir));

    store.create("boom", "old").unwrap();
    assert!(store.flush().await.is_err());

    // A newer edit for the same id arrives after the failure
    store.edit(1, "renamed", "new").unwrap();

    drop_reject_trigger(&db_path(&dir));
    store.flush().await.unwrap();

    // The requeued event applied first, the newer edit last
    assert_eq!(
        read_row(&db_path(&dir), 1),
        Some(("renamed".to_string(), "new".to_string()))
    );
}

// =============================================================================
// Per-Id Event Order
// =============================================================================

#[tokio::test]
async fn test_delete_then_recreate_persists_final_state() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    store.create("first", "life").unwrap();
    store.flush().await.unwrap();

    assert!(store.delete(1).unwrap());
    store.edit(1, "second", "life").unwrap();
    store.flush().await.unwrap();

    assert_eq!(
        read_row(&db_path(&dir), 1),
        Some(("second".to_string(), "life".to_string()))
    );
}

#[tokio::test]
async fn test_create_then_delete_before_flush_leaves_no_row() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    store.create("gone", "x").unwrap();
    assert!(store.delete(1).unwrap());
    store.flush().await.unwrap();

    assert_eq!(row_count(&db_path(&dir)), 0);
}

// =============================================================================
// Startup
// =============================================================================

#[tokio::test]
async fn test_startup_seeds_allocator_from_disk() {
    let dir = TempDir::new().unwrap();

    let store = open_store(&dir).await;
    store.edit(7, "seven", "s").unwrap();
    store.close().await.unwrap();
    drop(store);

    let reloaded = open_store(&dir).await;
    let fresh = reloaded.create("next", "n").unwrap();
    assert_eq!(fresh.id, 8);
}

#[tokio::test]
async fn test_open_fails_when_database_is_unreachable() {
    let dir = TempDir::new().unwrap();
    let bad_path = dir.path().join("missing").join("sub").join("notes.sqlite");

    let result = NoteStore::open(bad_path, IDLE_FLUSH).await;
    assert!(result.is_err());
}

// =============================================================================
// Metrics
// =============================================================================

#[tokio::test]
async fn test_metrics_track_flush_outcomes() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    store.create("A", "1").unwrap();
    let before = store.metrics().snapshot();
    assert_eq!(before.writes_buffered, 1);
    assert_eq!(before.live_notes, 1);
    assert_eq!(before.pending_events, 1);

    store.flush().await.unwrap();
    let after = store.metrics().snapshot();
    assert_eq!(after.flush_cycles, 1);
    assert_eq!(after.rows_inserted, 1);
    assert_eq!(after.pending_events, 0);

    store.delete(1).unwrap();
    store.flush().await.unwrap();
    let end = store.metrics().snapshot();
    assert_eq!(end.rows_deleted, 1);
    assert_eq!(end.live_notes, 0);
}
