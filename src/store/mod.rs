//! Write-back note storage.
//!
//! Memory is authoritative: a sorted id index answers every read, a
//! per-id write log buffers every mutation, and a background task
//! periodically persists the buffered events to SQLite in a single
//! transaction.
//!
//! # Design Principles
//!
//! - **Mutations never touch disk**: create, edit, update, and delete
//!   complete against memory and return; durability is deferred to
//!   the flusher.
//! - **Per-id submission order is preserved**: events for one id are
//!   buffered, swapped, applied, and merged back in the order they
//!   were submitted.
//! - **One transaction per cycle**: a flush applies its whole batch
//!   atomically; a failed batch leaves the database untouched.
//! - **Failed flushes merge back**: the detached batch is requeued in
//!   front of newer writes, so a write is never dropped once accepted.
//! - **Ids are never reused**: the allocator is seeded past the
//!   largest id on disk and only moves forward.
//!
//! # Invariants Enforced
//!
//! - The sorted id vector and the id map always cover exactly the
//!   same set of notes.
//! - At most one flush cycle runs at a time.
//! - Shutdown stops the flusher, then drains all pending writes
//!   before returning.

mod errors;
mod facade;
mod flusher;
mod index;
mod note;
mod write_log;

pub use errors::{StoreError, StoreResult};
pub use facade::NoteStore;
pub use index::NoteIndex;
pub use note::Note;
pub use write_log::{PendingWrite, WriteLog};
