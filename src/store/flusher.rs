//! The background flush cycle.
//!
//! Each cycle runs in three steps: swap the pending write log out
//! under the state lock, apply the detached batch to SQLite in one
//! transaction on a blocking thread, then report. On failure the
//! transaction has already rolled back and the batch is merged back
//! in front of any writes buffered during the attempt, so per-id
//! order holds and no write is ever dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::observability::{Event, Logger};

use super::errors::{StoreError, StoreResult};
use super::facade::NoteStore;
use super::write_log::WriteLog;

/// Flusher task body. Ticks at `interval` until shutdown flips, then
/// returns; the facade's `close` drains whatever is still pending.
pub(crate) async fn run(store: NoteStore, interval: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = time::interval(interval);
    // The first tick fires immediately; skip it so the first flush
    // lands one full interval after startup.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = flush_cycle(&store).await {
                    Logger::error(Event::FlushFailed, &[("error", &e.to_string())]);
                }
            }
            _ = shutdown.changed() => break,
        }
    }
}

/// One flush cycle. The gate serializes cycles so a slow disk never
/// lets two transactions race; the state lock is held only for the
/// swap, never across I/O.
pub(crate) async fn flush_cycle(store: &NoteStore) -> StoreResult<()> {
    let _gate = store.flush_gate.lock().await;

    let batch = {
        let mut state = store
            .state
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;
        if state.pending.is_empty() {
            return Ok(());
        }
        let batch = state.pending.take();
        store.sync_gauges(&state);
        batch
    };
    let events = batch.event_count();

    // The batch rides an Arc so it survives the blocking task even if
    // that task panics, keeping the merge-back possible.
    let shared = Arc::new(batch);
    let db = Arc::clone(&store.db);
    let task_batch = Arc::clone(&shared);
    let outcome = tokio::task::spawn_blocking(move || db.apply_batch(&task_batch)).await;

    match outcome {
        Ok(Ok(report)) => {
            store.metrics.increment_flush_cycles();
            store.metrics.add_rows_inserted(report.inserted);
            store.metrics.add_rows_updated(report.updated);
            store.metrics.add_rows_deleted(report.deleted);
            Logger::info(
                Event::FlushComplete,
                &[
                    ("deleted", &report.deleted.to_string()),
                    ("events", &events.to_string()),
                    ("inserted", &report.inserted.to_string()),
                    ("updated", &report.updated.to_string()),
                ],
            );
            Ok(())
        }
        Ok(Err(db_err)) => {
            requeue(store, shared)?;
            store.metrics.increment_flush_failures();
            Err(StoreError::Database(db_err))
        }
        Err(join_err) => {
            // The transaction rolled back when its guard dropped on
            // the panicking thread; the batch is still intact here.
            requeue(store, shared)?;
            store.metrics.increment_flush_failures();
            Err(StoreError::TaskFailed(join_err.to_string()))
        }
    }
}

/// Merge a failed batch back in front of anything buffered while the
/// flush was in flight.
fn requeue(store: &NoteStore, shared: Arc<WriteLog>) -> StoreResult<()> {
    let batch = Arc::try_unwrap(shared).unwrap_or_else(|arc| (*arc).clone());
    let mut state = store
        .state
        .lock()
        .map_err(|_| StoreError::LockPoisoned)?;
    state.pending.requeue(batch);
    store.sync_gauges(&state);
    Ok(())
}
