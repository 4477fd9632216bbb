//! Observability events for NoteDB
//!
//! Defines all observable events that can occur during operation.
//! Events are explicit and typed; log call sites take an `Event`
//! rather than a free-form string so names cannot drift.

use std::fmt;

/// Observable events in NoteDB
///
/// The catalog covers:
/// - Boot & lifecycle
/// - Configuration
/// - Store load
/// - Flush cycles and per-row applies
/// - Server readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// NoteDB startup begins
    StartupBegin,
    /// NoteDB startup complete, ready to serve
    StartupComplete,
    /// Startup aborted before serving
    StartupFailed,
    /// Shutdown initiated
    ShutdownBegin,
    /// Shutdown complete
    ShutdownComplete,

    // Configuration
    /// Configuration loaded from file
    ConfigLoaded,
    /// Configuration file absent, defaults in effect
    ConfigDefaulted,

    // Store
    /// Full table load finished at startup
    NotesLoaded,

    // Flush
    /// Flush batch committed
    FlushComplete,
    /// Flush batch rolled back and requeued
    FlushFailed,
    /// Row inserted during a flush
    RowInserted,
    /// Row updated during a flush
    RowUpdated,
    /// Row deleted during a flush
    RowDeleted,

    // Server
    /// Server serving (ready for requests)
    Serving,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            // Boot & Lifecycle
            Event::StartupBegin => "NOTEDB_STARTUP_BEGIN",
            Event::StartupComplete => "NOTEDB_STARTUP_COMPLETE",
            Event::StartupFailed => "NOTEDB_STARTUP_FAILED",
            Event::ShutdownBegin => "SHUTDOWN_BEGIN",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            // Configuration
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigDefaulted => "CONFIG_DEFAULTED",

            // Store
            Event::NotesLoaded => "NOTES_LOADED",

            // Flush
            Event::FlushComplete => "FLUSH_COMPLETE",
            Event::FlushFailed => "FLUSH_FAILED",
            Event::RowInserted => "ROW_INSERTED",
            Event::RowUpdated => "ROW_UPDATED",
            Event::RowDeleted => "ROW_DELETED",

            // Server
            Event::Serving => "NOTEDB_SERVING",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
