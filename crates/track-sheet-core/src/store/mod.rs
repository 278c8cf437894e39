//! Record persistence: one durable slot plus the in-memory record list.

mod slot;
pub use slot::*;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::PatientRecord;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable home for the serialized record list.
///
/// A single named blob, read once at startup and overwritten whole on every
/// append. Implementations are injected so the core stays testable without
/// any particular host storage.
pub trait StorageSlot: Send {
    /// Read the current blob; `None` when nothing has been written yet.
    fn read(&self) -> StoreResult<Option<String>>;

    /// Overwrite the blob.
    fn write(&self, blob: &str) -> StoreResult<()>;
}

/// Ordered list of saved records mirrored to a [`StorageSlot`].
///
/// Lifecycle: loaded once at startup, appended to on each save, full list
/// re-serialized after every append. No update, delete, or compaction.
pub struct RecordStore {
    slot: Box<dyn StorageSlot>,
    records: Vec<PatientRecord>,
}

impl RecordStore {
    /// Load the persisted record list from the slot.
    ///
    /// An absent, unreadable, or corrupt blob yields an empty store. The
    /// application must stay usable either way, so the failure is logged
    /// rather than surfaced.
    pub fn load(slot: Box<dyn StorageSlot>) -> Self {
        let records = match slot.read() {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<PatientRecord>>(&blob) {
                Ok(records) => records,
                Err(e) => {
                    warn!("discarding unreadable record blob: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("record slot unreadable, starting empty: {}", e);
                Vec::new()
            }
        };

        info!(count = records.len(), "record store loaded");
        Self { slot, records }
    }

    /// Append one record, then rewrite the persisted list.
    ///
    /// The record joins the in-memory list before the write, so a failed
    /// write keeps it visible for this session; the caller surfaces the
    /// returned error as a non-blocking notification.
    pub fn append(&mut self, record: PatientRecord) -> StoreResult<()> {
        self.records.push(record);
        let blob = serde_json::to_string(&self.records)?;
        self.slot.write(&blob)?;
        Ok(())
    }

    /// Saved records in save order.
    pub fn list(&self) -> &[PatientRecord] {
        &self.records
    }

    /// Number of saved records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been saved yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PatientHeader, ServiceCatalog, TrackSheet};

    fn make_record(name: &str) -> PatientRecord {
        let catalog = ServiceCatalog::new(vec!["Lab".into()]);
        let mut header = PatientHeader::default();
        header.name = name.into();
        PatientRecord::new(header, TrackSheet::for_catalog(&catalog))
    }

    #[test]
    fn test_load_from_empty_slot() {
        let store = RecordStore::load(Box::new(MemorySlot::new()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_from_corrupt_blob_starts_empty() {
        let store = RecordStore::load(Box::new(MemorySlot::with_blob("not json at all")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_from_wrong_shape_starts_empty() {
        let store = RecordStore::load(Box::new(MemorySlot::with_blob(r#"{"records": 3}"#)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut store = RecordStore::load(Box::new(MemorySlot::new()));

        store.append(make_record("First")).unwrap();
        store.append(make_record("Second")).unwrap();
        store.append(make_record("Third")).unwrap();

        let names: Vec<&str> = store.list().iter().map(|r| r.header.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_append_rewrites_full_list() {
        let slot = MemorySlot::new();
        let blob_handle = slot.clone();
        let mut store = RecordStore::load(Box::new(slot));

        store.append(make_record("First")).unwrap();
        store.append(make_record("Second")).unwrap();

        let blob = blob_handle.read().unwrap().unwrap();
        let persisted: Vec<PatientRecord> = serde_json::from_str(&blob).unwrap();
        assert_eq!(persisted, store.list());
    }

    struct FailingSlot;

    impl StorageSlot for FailingSlot {
        fn read(&self) -> StoreResult<Option<String>> {
            Ok(None)
        }

        fn write(&self, _blob: &str) -> StoreResult<()> {
            Err(StoreError::Backend("disk full".into()))
        }
    }

    #[test]
    fn test_failed_write_keeps_record_in_memory() {
        let mut store = RecordStore::load(Box::new(FailingSlot));

        let result = store.append(make_record("Kept"));
        assert!(result.is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].header.name, "Kept");
    }
}
