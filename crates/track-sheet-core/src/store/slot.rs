//! Storage slot backends.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension};

use super::{StorageSlot, StoreResult};

/// Name of the slot holding the serialized record list.
pub const RECORDS_SLOT: &str = "patient_track_records";

/// Key-value schema: one row per named slot.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS track_state (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// SQLite-backed slot.
pub struct SqliteSlot {
    conn: Connection,
    key: &'static str,
}

impl SqliteSlot {
    /// Open the database at `path`, creating it if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            key: RECORDS_SLOT,
        })
    }

    /// In-memory database (for testing and throwaway sessions).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            key: RECORDS_SLOT,
        })
    }
}

impl StorageSlot for SqliteSlot {
    fn read(&self) -> StoreResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM track_state WHERE key = ?",
                [self.key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    fn write(&self, blob: &str) -> StoreResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO track_state (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            "#,
            [self.key, blob],
        )?;
        Ok(())
    }
}

/// Volatile slot whose contents die with the last clone. Used by tests and
/// by hosts that want a scratch session.
#[derive(Clone, Default)]
pub struct MemorySlot {
    cell: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-seeded with a blob, e.g. a corrupt one.
    pub fn with_blob(blob: &str) -> Self {
        Self {
            cell: Arc::new(Mutex::new(Some(blob.to_string()))),
        }
    }

    fn cell(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.cell.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self) -> StoreResult<Option<String>> {
        Ok(self.cell().clone())
    }

    fn write(&self, blob: &str) -> StoreResult<()> {
        *self.cell() = Some(blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_slot_starts_empty() {
        let slot = SqliteSlot::open_in_memory().unwrap();
        assert_eq!(slot.read().unwrap(), None);
    }

    #[test]
    fn test_sqlite_slot_overwrites() {
        let slot = SqliteSlot::open_in_memory().unwrap();

        slot.write("[1]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[1]"));

        slot.write("[1,2]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_sqlite_slot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.db");

        {
            let slot = SqliteSlot::open(&path).unwrap();
            slot.write("[\"blob\"]").unwrap();
        }

        let slot = SqliteSlot::open(&path).unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[\"blob\"]"));
    }

    #[test]
    fn test_memory_slot_shares_contents_across_clones() {
        let slot = MemorySlot::new();
        let handle = slot.clone();

        slot.write("x").unwrap();
        assert_eq!(handle.read().unwrap().as_deref(), Some("x"));
    }
}
