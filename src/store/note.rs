//! Note record type.

use serde::{Deserialize, Serialize};

/// A single note record.
///
/// `id == 0` means "not yet assigned"; the store allocates a real id
/// on create and never hands id 0 to a live note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
}

impl Note {
    /// Build a note from its parts.
    pub fn new(id: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
        }
    }
}
