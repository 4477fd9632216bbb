//! Per-id buffered mutations awaiting durable persistence.

use std::collections::HashMap;

use super::note::Note;

/// A buffered mutation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingWrite {
    /// Insert-or-update carrying the full record snapshot.
    Upsert(Note),
    /// Deletion marker.
    Tombstone,
}

/// The pending write log.
///
/// Maps each id to its buffered events in submission order. Events for
/// different ids carry no relative order. The flusher consumes the log
/// with `take`; a failed flush restores its batch with `requeue`,
/// which puts batch events ahead of anything recorded for the same id
/// during the flush window, so per-id order survives failure.
#[derive(Debug, Clone, Default)]
pub struct WriteLog {
    entries: HashMap<i64, Vec<PendingWrite>>,
}

impl WriteLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total buffered events across all ids.
    pub fn event_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Append an event to the id's sequence.
    pub fn record(&mut self, id: i64, write: PendingWrite) {
        self.entries.entry(id).or_default().push(write);
    }

    /// Swap the log out, leaving an empty one in its place.
    pub fn take(&mut self) -> WriteLog {
        std::mem::take(self)
    }

    /// Merge a failed batch back in, batch events first per id.
    pub fn requeue(&mut self, batch: WriteLog) {
        for (id, mut batch_events) in batch.entries {
            let newer = self.entries.entry(id).or_default();
            batch_events.append(newer);
            *newer = batch_events;
        }
    }

    /// Iterate ids and their event sequences. Cross-id order is
    /// unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &[PendingWrite])> {
        self.entries
            .iter()
            .map(|(id, events)| (*id, events.as_slice()))
    }
}
