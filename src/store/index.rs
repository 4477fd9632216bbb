//! Sorted in-memory view of live notes.

use std::collections::HashMap;

use super::note::Note;

/// Ordered index over live notes.
///
/// Keeps a sorted vector of ids next to the id-to-note map so range
/// queries by rank are a plain slice walk. Invariant: the id vector
/// and the map key set always cover exactly the same ids, and the
/// vector is sorted ascending whenever a reader can observe it.
#[derive(Debug, Default)]
pub struct NoteIndex {
    ids: Vec<i64>,
    notes: HashMap<i64, Note>,
}

impl NoteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live notes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Point lookup by id.
    pub fn get(&self, id: i64) -> Option<&Note> {
        self.notes.get(&id)
    }

    /// Largest live id, if any.
    pub fn max_id(&self) -> Option<i64> {
        self.ids.last().copied()
    }

    /// Insert or replace a note. Returns true if the id was new.
    pub fn upsert(&mut self, note: Note) -> bool {
        let id = note.id;
        let fresh = self.notes.insert(id, note).is_none();
        if fresh {
            self.ids.push(id);
            self.ids.sort_unstable();
        }
        fresh
    }

    /// Remove a note. Returns false if the id was not live.
    ///
    /// Removal swaps the id with the last element, truncates, and
    /// re-sorts, mirroring the insertion policy.
    pub fn remove(&mut self, id: i64) -> bool {
        if self.notes.remove(&id).is_none() {
            return false;
        }
        if let Ok(pos) = self.ids.binary_search(&id) {
            let last = self.ids.len() - 1;
            self.ids.swap(pos, last);
            self.ids.truncate(last);
            self.ids.sort_unstable();
        }
        true
    }

    /// Up to `limit` notes in ascending id order, starting at the
    /// `offset`-th smallest live id. An offset at or past the live
    /// count yields an empty vector; a limit past the remainder yields
    /// only the remainder.
    pub fn range(&self, offset: usize, limit: usize) -> Vec<Note> {
        if offset >= self.ids.len() {
            return Vec::new();
        }
        let end = offset.saturating_add(limit).min(self.ids.len());
        self.ids[offset..end]
            .iter()
            .filter_map(|id| self.notes.get(id).cloned())
            .collect()
    }
}
