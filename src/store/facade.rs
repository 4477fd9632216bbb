//! The note store facade.
//!
//! Public operation surface over the in-memory state and the SQLite
//! database. Every mutation lands in the index and the pending write
//! log under one lock and returns without touching disk; the
//! background flusher owns all I/O.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::db::{DbError, NoteDatabase};
use crate::observability::{Event, Logger, StoreMetrics};

use super::errors::{StoreError, StoreResult};
use super::flusher;
use super::index::NoteIndex;
use super::note::Note;
use super::write_log::{PendingWrite, WriteLog};

/// In-memory authoritative state: the ordered index, the pending
/// write log, and the id allocator. One mutex guards all three so a
/// facade operation is a single critical section with no I/O inside.
#[derive(Debug)]
pub(crate) struct StoreState {
    pub(crate) index: NoteIndex,
    pub(crate) pending: WriteLog,
    pub(crate) next_id: i64,
}

impl StoreState {
    /// The single mutation primitive for upserts. `id == 0` allocates
    /// a fresh id; a forced id at or above the allocator advances it
    /// past the id so ids are never reused.
    fn upsert(&mut self, id: i64, mut note: Note) -> Note {
        let id = if id == 0 {
            let fresh = self.next_id;
            self.next_id = self.next_id.saturating_add(1);
            fresh
        } else {
            if id >= self.next_id {
                self.next_id = id.saturating_add(1);
            }
            id
        };

        note.id = id;
        self.index.upsert(note.clone());
        self.pending.record(id, PendingWrite::Upsert(note.clone()));
        note
    }

    /// Delete primitive. Absent ids are a no-op; live ids leave the
    /// index immediately and buffer a tombstone.
    fn remove(&mut self, id: i64) -> bool {
        if !self.index.remove(id) {
            return false;
        }
        self.pending.record(id, PendingWrite::Tombstone);
        true
    }
}

/// Write-back note store.
///
/// Cloning is cheap and clones share all state. Reads and mutations
/// are synchronous in-memory operations; `flush` and `close` are the
/// only async entry points because they wait on disk I/O.
#[derive(Clone)]
pub struct NoteStore {
    pub(crate) state: Arc<Mutex<StoreState>>,
    pub(crate) db: Arc<NoteDatabase>,
    /// Serializes flush cycles; held across the blocking I/O.
    pub(crate) flush_gate: Arc<tokio::sync::Mutex<()>>,
    pub(crate) metrics: Arc<StoreMetrics>,
    shutdown: Arc<watch::Sender<bool>>,
    flusher: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl NoteStore {
    /// Open the database, load every note into memory, seed the id
    /// allocator one past the largest loaded id, and start the
    /// background flusher at the given interval.
    ///
    /// Failure here is fatal to the caller: a store that cannot reach
    /// its backing table must not serve.
    pub async fn open(db_path: impl AsRef<Path>, flush_interval: Duration) -> StoreResult<Self> {
        let path = db_path.as_ref().to_path_buf();
        let (db, notes) = tokio::task::spawn_blocking(move || {
            let db = NoteDatabase::open(path)?;
            let notes = db.load_all()?;
            Ok::<_, DbError>((db, notes))
        })
        .await
        .map_err(|e| StoreError::TaskFailed(e.to_string()))??;

        let mut index = NoteIndex::new();
        for note in notes {
            index.upsert(note);
        }
        let next_id = index.max_id().map_or(1, |max| max.saturating_add(1));
        let loaded = index.len();

        let metrics = Arc::new(StoreMetrics::new());
        metrics.set_live_notes(loaded as u64);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let store = Self {
            state: Arc::new(Mutex::new(StoreState {
                index,
                pending: WriteLog::new(),
                next_id,
            })),
            db: Arc::new(db),
            flush_gate: Arc::new(tokio::sync::Mutex::new(())),
            metrics,
            shutdown: Arc::new(shutdown_tx),
            flusher: Arc::new(Mutex::new(None)),
        };

        let handle = tokio::spawn(flusher::run(store.clone(), flush_interval, shutdown_rx));
        *store
            .flusher
            .lock()
            .map_err(|_| StoreError::LockPoisoned)? = Some(handle);

        Logger::info(Event::NotesLoaded, &[("count", &loaded.to_string())]);

        Ok(store)
    }

    /// Create a note under a freshly allocated id.
    pub fn create(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StoreResult<Note> {
        let mut state = self.lock_state()?;
        let stored = state.upsert(0, Note::new(0, title, content));
        self.metrics.increment_writes_buffered();
        self.sync_gauges(&state);
        Ok(stored)
    }

    /// Replace a note's title and content, keeping its id. An id that
    /// is not live is created, advancing the allocator past it.
    pub fn edit(
        &self,
        id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StoreResult<Note> {
        let mut state = self.lock_state()?;
        let stored = state.upsert(id, Note::new(id, title, content));
        self.metrics.increment_writes_buffered();
        self.sync_gauges(&state);
        Ok(stored)
    }

    /// The general mutation entry point. `Some(note)` upserts under
    /// `id` (0 allocates); `None` deletes, silently ignoring ids that
    /// are not live.
    pub fn update(&self, id: i64, note: Option<Note>) -> StoreResult<Option<Note>> {
        match note {
            Some(note) => {
                let mut state = self.lock_state()?;
                let stored = state.upsert(id, note);
                self.metrics.increment_writes_buffered();
                self.sync_gauges(&state);
                Ok(Some(stored))
            }
            None => {
                self.delete(id)?;
                Ok(None)
            }
        }
    }

    /// Remove a note. The return value reports whether the id was
    /// live; deleting an absent id changes nothing.
    pub fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut state = self.lock_state()?;
        let removed = state.remove(id);
        if removed {
            self.metrics.increment_writes_buffered();
            self.sync_gauges(&state);
        }
        Ok(removed)
    }

    /// In-memory point lookup. Never touches the database.
    pub fn get(&self, id: i64) -> StoreResult<Option<Note>> {
        Ok(self.lock_state()?.index.get(id).cloned())
    }

    /// Up to `limit` notes sorted ascending by id, starting at the
    /// `offset`-th smallest live id.
    pub fn range(&self, offset: usize, limit: usize) -> StoreResult<Vec<Note>> {
        Ok(self.lock_state()?.index.range(offset, limit))
    }

    /// Live note count.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.lock_state()?.index.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.lock_state()?.index.is_empty())
    }

    /// Buffered events not yet durably flushed.
    pub fn pending_events(&self) -> StoreResult<usize> {
        Ok(self.lock_state()?.pending.event_count())
    }

    /// Run one flush cycle now and surface its outcome. The background
    /// flusher swallows failures after requeueing; this variant hands
    /// the error to the caller instead.
    pub async fn flush(&self) -> StoreResult<()> {
        flusher::flush_cycle(self).await
    }

    /// Stop the flusher, wait for any in-flight cycle, then drain the
    /// remaining pending writes so shutdown never strands a write. The
    /// database handle closes when the last store clone drops.
    pub async fn close(&self) -> StoreResult<()> {
        Logger::info(Event::ShutdownBegin, &[]);

        let _ = self.shutdown.send(true);
        let handle = self
            .flusher
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .take();
        if let Some(handle) = handle {
            handle
                .await
                .map_err(|e| StoreError::TaskFailed(e.to_string()))?;
        }

        // Writes accepted after the flusher's final tick drain here.
        self.flush().await?;

        Logger::info(Event::ShutdownComplete, &[]);
        Ok(())
    }

    /// Metrics registry shared with the HTTP layer.
    pub fn metrics(&self) -> Arc<StoreMetrics> {
        Arc::clone(&self.metrics)
    }

    fn lock_state(&self) -> StoreResult<MutexGuard<'_, StoreState>> {
        self.state.lock().map_err(|_| StoreError::LockPoisoned)
    }

    pub(crate) fn sync_gauges(&self, state: &StoreState) {
        self.metrics.set_live_notes(state.index.len() as u64);
        self.metrics
            .set_pending_events(state.pending.event_count() as u64);
    }
}
