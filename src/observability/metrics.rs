//! Metrics registry for NoteDB
//!
//! - Monotonic counters plus two gauges (live notes, pending events)
//! - Reset only on process start
//! - Thread-safe but lock-minimal

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Metrics registry shared between the store and the HTTP layer
///
/// # Thread Safety
///
/// All values use atomic operations for thread-safe updates.
/// Uses Relaxed ordering for minimal overhead.
#[derive(Debug, Default)]
pub struct StoreMetrics {
    /// Committed flush batches
    flush_cycles: AtomicU64,
    /// Rolled-back flush batches
    flush_failures: AtomicU64,
    /// Rows inserted across all flushes
    rows_inserted: AtomicU64,
    /// Rows updated across all flushes
    rows_updated: AtomicU64,
    /// Rows deleted across all flushes
    rows_deleted: AtomicU64,
    /// Mutations accepted by the facade
    writes_buffered: AtomicU64,
    /// Live note count (gauge)
    live_notes: AtomicU64,
    /// Buffered events awaiting flush (gauge)
    pending_events: AtomicU64,
}

impl StoreMetrics {
    /// Create a new metrics registry with all values at zero
    pub fn new() -> Self {
        Self::default()
    }

    // Flush metrics

    /// Increment committed flush batches
    pub fn increment_flush_cycles(&self) {
        self.flush_cycles.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment rolled-back flush batches
    pub fn increment_flush_failures(&self) {
        self.flush_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Add rows inserted by one flush
    pub fn add_rows_inserted(&self, rows: u64) {
        self.rows_inserted.fetch_add(rows, Ordering::Relaxed);
    }

    /// Add rows updated by one flush
    pub fn add_rows_updated(&self, rows: u64) {
        self.rows_updated.fetch_add(rows, Ordering::Relaxed);
    }

    /// Add rows deleted by one flush
    pub fn add_rows_deleted(&self, rows: u64) {
        self.rows_deleted.fetch_add(rows, Ordering::Relaxed);
    }

    // Facade metrics

    /// Increment accepted mutations
    pub fn increment_writes_buffered(&self) {
        self.writes_buffered.fetch_add(1, Ordering::Relaxed);
    }

    /// Set the live note gauge
    pub fn set_live_notes(&self, count: u64) {
        self.live_notes.store(count, Ordering::Relaxed);
    }

    /// Set the pending event gauge
    pub fn set_pending_events(&self, count: u64) {
        self.pending_events.store(count, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            flush_cycles: self.flush_cycles.load(Ordering::Relaxed),
            flush_failures: self.flush_failures.load(Ordering::Relaxed),
            rows_inserted: self.rows_inserted.load(Ordering::Relaxed),
            rows_updated: self.rows_updated.load(Ordering::Relaxed),
            rows_deleted: self.rows_deleted.load(Ordering::Relaxed),
            writes_buffered: self.writes_buffered.load(Ordering::Relaxed),
            live_notes: self.live_notes.load(Ordering::Relaxed),
            pending_events: self.pending_events.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
///
/// Serializes directly as the /metrics response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub flush_cycles: u64,
    pub flush_failures: u64,
    pub rows_inserted: u64,
    pub rows_updated: u64,
    pub rows_deleted: u64,
    pub writes_buffered: u64,
    pub live_notes: u64,
    pub pending_events: u64,
}
