//! SQLite persistence for notes.
//!
//! The database is the durable half of the write-back pair. The store
//! owns the authoritative in-memory state; this module reconciles the
//! pending write log into the `notes` table, one transaction per flush
//! batch, and reads the table back in full at startup.
//!
//! The connection lives behind a mutex. Callers on the async runtime
//! must reach it through `spawn_blocking` so disk I/O never stalls the
//! executor.

mod errors;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{params, Connection};

use crate::observability::{Event, Logger};
use crate::store::{Note, PendingWrite, WriteLog};

pub use errors::{DbError, DbResult};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS notes (
    id      INTEGER PRIMARY KEY,
    title   TEXT NOT NULL,
    content TEXT NOT NULL
)";

/// Handle to the notes database.
#[derive(Debug)]
pub struct NoteDatabase {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl NoteDatabase {
    /// Open the database file, creating it and the schema if needed.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row. Startup only; the store holds the full set in
    /// memory afterwards.
    pub fn load_all(&self) -> DbResult<Vec<Note>> {
        let conn = self.conn.lock().map_err(|_| DbError::LockPoisoned)?;
        let mut stmt = conn.prepare("SELECT id, title, content FROM notes")?;
        let rows = stmt.query_map([], |row| {
            Ok(Note {
                id: row.get(0)?,
                title: row.get(1)?,
                content: row.get(2)?,
            })
        })?;

        let mut notes = Vec::new();
        for row in rows {
            notes.push(row?);
        }
        Ok(notes)
    }

    /// Apply one flush batch inside a single transaction.
    ///
    /// Events for an id run in submission order. A tombstone issues a
    /// DELETE (absent rows delete to nothing); an upsert issues an
    /// UPDATE when the row exists and an INSERT otherwise. Any error
    /// rolls the whole transaction back via the dropped transaction
    /// guard.
    pub fn apply_batch(&self, batch: &WriteLog) -> DbResult<BatchReport> {
        let mut conn = self.conn.lock().map_err(|_| DbError::LockPoisoned)?;
        let tx = conn.transaction()?;
        let mut report = BatchReport::default();

        for (id, events) in batch.iter() {
            for event in events {
                match event {
                    PendingWrite::Tombstone => {
                        tx.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
                        report.deleted += 1;
                        Logger::trace(Event::RowDeleted, &[("id", &id.to_string())]);
                    }
                    PendingWrite::Upsert(note) => {
                        let exists: bool = tx.query_row(
                            "SELECT EXISTS(SELECT 1 FROM notes WHERE id = ?1)",
                            params![id],
                            |row| row.get(0),
                        )?;
                        if exists {
                            tx.execute(
                                "UPDATE notes SET title = ?1, content = ?2 WHERE id = ?3",
                                params![note.title, note.content, id],
                            )?;
                            report.updated += 1;
                            Logger::trace(Event::RowUpdated, &[("id", &id.to_string())]);
                        } else {
                            tx.execute(
                                "INSERT INTO notes (id, title, content) VALUES (?1, ?2, ?3)",
                                params![id, note.title, note.content],
                            )?;
                            report.inserted += 1;
                            Logger::trace(Event::RowInserted, &[("id", &id.to_string())]);
                        }
                    }
                }
            }
        }

        tx.commit()?;
        Ok(report)
    }
}

/// Row counts from one committed batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub inserted: u64,
    pub updated: u64,
    pub deleted: u64,
}
