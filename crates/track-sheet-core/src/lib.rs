//! Patient-Track Core Library
//!
//! Local-first engine for per-patient service-delivery tracking with
//! turn-around-time variance reporting.
//!
//! # Architecture
//!
//! ```text
//!                    Host shell (webview / mobile UI)
//!                                  │ FFI
//!                ┌─────────────────▼─────────────────┐
//!                │          AppController            │
//!                │   Home ⇄ TrackSheet ⇄ ProcessSheet │
//!                └───────┬───────────────┬───────────┘
//!                        │               │
//!                 TrackSheetForm    ProcessSheet
//!             (edit + variance)   (matrix + render)
//!                        │               ▲
//!                        ▼ submit        │ list
//!                ┌───────────────────────┴───────────┐
//!                │            RecordStore            │
//!                │  in-memory list ⇄ StorageSlot     │
//!                │        (SQLite kv / memory)       │
//!                └───────────────────────────────────┘
//! ```
//!
//! # Core Principle
//!
//! **Records are immutable once saved.** The store only ever appends; the
//! report renders whatever was saved, unconditionally.
//!
//! # Modules
//!
//! - [`models`]: Domain types (ServiceCatalog, PatientHeader, TrackSheet, PatientRecord)
//! - [`store`]: Storage slot port with SQLite and in-memory backends
//! - [`form`]: Mutable track sheet and the save path
//! - [`report`]: Process-sheet matrix plus printable/CSV renderers
//! - [`app`]: Screen navigation controller

pub mod app;
pub mod form;
pub mod models;
pub mod report;
pub mod store;

// Re-export commonly used types
pub use app::{AppController, AppError, View};
pub use form::{FormError, TrackSheetForm};
pub use models::{
    HeaderField, PatientHeader, PatientRecord, RowField, ServiceCatalog, ServiceId, TrackRow,
    TrackSheet,
};
pub use report::{ProcessSheet, ReportRow, ScheduleStatus, ServiceCell};
pub use store::{MemorySlot, RecordStore, SqliteSlot, StorageSlot, StoreError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum TrackError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<StoreError> for TrackError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Json(e) => TrackError::SerializationError(e.to_string()),
            other => TrackError::StorageError(other.to_string()),
        }
    }
}

impl From<FormError> for TrackError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::ServiceOutOfRange { .. } => TrackError::UnknownService(e.to_string()),
            FormError::Store(e) => e.into(),
        }
    }
}

impl From<AppError> for TrackError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Form(e) => e.into(),
            other => TrackError::InvalidState(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for TrackError {
    fn from(e: serde_json::Error) -> Self {
        TrackError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for TrackError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        TrackError::InvalidState(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a tracker persisted at the given database path, using the
/// standard service catalog.
#[uniffi::export]
pub fn open_tracker(path: String) -> Result<Arc<PatientTrack>, TrackError> {
    let slot = SqliteSlot::open(&path)?;
    Ok(PatientTrack::from_slot(Box::new(slot), ServiceCatalog::standard()))
}

/// Create a tracker backed by an in-memory database (for testing).
#[uniffi::export]
pub fn open_tracker_in_memory() -> Result<Arc<PatientTrack>, TrackError> {
    let slot = SqliteSlot::open_in_memory()?;
    Ok(PatientTrack::from_slot(Box::new(slot), ServiceCatalog::standard()))
}

/// Open or create a tracker with a caller-supplied service catalog. The
/// catalog is configuration; form rows and report columns follow it.
#[uniffi::export]
pub fn open_tracker_with_catalog(
    path: String,
    services: Vec<String>,
) -> Result<Arc<PatientTrack>, TrackError> {
    let slot = SqliteSlot::open(&path)?;
    Ok(PatientTrack::from_slot(Box::new(slot), ServiceCatalog::new(services)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe controller wrapper for FFI. The mutex keeps every operation
/// atomic-per-call even when the host dispatches from an async runtime.
#[derive(uniffi::Object)]
pub struct PatientTrack {
    app: Arc<Mutex<AppController>>,
}

impl PatientTrack {
    fn from_slot(slot: Box<dyn StorageSlot>, catalog: ServiceCatalog) -> Arc<Self> {
        Arc::new(Self {
            app: Arc::new(Mutex::new(AppController::new(catalog, slot))),
        })
    }
}

#[uniffi::export]
impl PatientTrack {
    // =========================================================================
    // Navigation
    // =========================================================================

    /// Active screen: "home", "track_sheet", or "process_sheet".
    pub fn current_view(&self) -> Result<String, TrackError> {
        let app = self.app.lock()?;
        Ok(view_to_string(app.view()).to_string())
    }

    /// Open a fresh input form.
    pub fn open_track_sheet(&self) -> Result<(), TrackError> {
        let mut app = self.app.lock()?;
        app.open_track_sheet();
        Ok(())
    }

    /// Open the records report.
    pub fn open_process_sheet(&self) -> Result<(), TrackError> {
        let mut app = self.app.lock()?;
        app.open_process_sheet();
        Ok(())
    }

    /// Return to the landing screen, discarding any in-progress form.
    pub fn back(&self) -> Result<(), TrackError> {
        let mut app = self.app.lock()?;
        app.back();
        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Service names in catalog order.
    pub fn service_names(&self) -> Result<Vec<String>, TrackError> {
        let app = self.app.lock()?;
        Ok(app.catalog().names().to_vec())
    }

    // =========================================================================
    // Form Operations
    // =========================================================================

    /// Update one header field of the open form by its string key
    /// ("name", "mrn", "reportingDate", "reportingTime").
    pub fn set_header_field(&self, field: String, value: String) -> Result<(), TrackError> {
        let field = HeaderField::from_key(&field).ok_or(TrackError::UnknownField(field))?;
        let mut app = self.app.lock()?;
        app.set_header_field(field, value)?;
        Ok(())
    }

    /// Update one row field of the open form, addressed by service name and
    /// field key. Returns the updated row, variance recomputed.
    pub fn set_row_field(
        &self,
        service: String,
        field: String,
        value: String,
    ) -> Result<FfiTrackRow, TrackError> {
        let field = RowField::from_key(&field).ok_or(TrackError::UnknownField(field))?;
        let mut app = self.app.lock()?;
        let id = app
            .service_id(&service)
            .ok_or(TrackError::UnknownService(service))?;
        let row = app.set_row_field(id, field, value)?;
        Ok(row.into())
    }

    /// Snapshot of the open form for re-rendering.
    pub fn current_sheet(&self) -> Result<FfiTrackSheet, TrackError> {
        let app = self.app.lock()?;
        let form = app
            .form()
            .ok_or(TrackError::InvalidState("No track sheet is open".into()))?;
        Ok(FfiTrackSheet {
            header: form.header().clone().into(),
            services: app.catalog().names().to_vec(),
            rows: form.sheet().rows().iter().cloned().map(Into::into).collect(),
        })
    }

    /// Save the open form; returns the new record's id and navigates home.
    /// A storage-write failure is returned as an error while the record is
    /// retained in memory, so the host should notify rather than retry.
    pub fn save_record(&self) -> Result<String, TrackError> {
        let mut app = self.app.lock()?;
        Ok(app.save_record()?)
    }

    // =========================================================================
    // Records & Report
    // =========================================================================

    /// Saved records in save order.
    pub fn list_records(&self) -> Result<Vec<FfiPatientRecord>, TrackError> {
        let app = self.app.lock()?;
        Ok(app.records().iter().cloned().map(Into::into).collect())
    }

    /// The report matrix over all saved records.
    pub fn process_sheet(&self) -> Result<FfiProcessSheet, TrackError> {
        let app = self.app.lock()?;
        Ok(app.process_sheet().into())
    }

    /// Printable HTML for the active screen; the host feeds it to its
    /// native print flow.
    pub fn printable_html(&self) -> Result<String, TrackError> {
        let app = self.app.lock()?;
        Ok(app.printable()?)
    }

    /// CSV export of the report matrix.
    pub fn export_csv(&self) -> Result<String, TrackError> {
        let app = self.app.lock()?;
        Ok(app.export_csv())
    }
}

fn view_to_string(view: View) -> &'static str {
    match view {
        View::Home => "home",
        View::TrackSheet => "track_sheet",
        View::ProcessSheet => "process_sheet",
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient header.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientHeader {
    pub name: String,
    pub mrn: String,
    pub reporting_date: String,
    pub reporting_time: String,
}

impl From<PatientHeader> for FfiPatientHeader {
    fn from(header: PatientHeader) -> Self {
        Self {
            name: header.name,
            mrn: header.mrn,
            reporting_date: header.reporting_date,
            reporting_time: header.reporting_time,
        }
    }
}

impl From<FfiPatientHeader> for PatientHeader {
    fn from(header: FfiPatientHeader) -> Self {
        Self {
            name: header.name,
            mrn: header.mrn,
            reporting_date: header.reporting_date,
            reporting_time: header.reporting_time,
        }
    }
}

/// FFI-safe track row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTrackRow {
    pub desired_date: String,
    pub desired_time: String,
    pub desired_tat: String,
    pub actual_date: String,
    pub actual_time: String,
    pub actual_tat: String,
    pub variance_tat: String,
    pub gaps_identified: String,
    pub corrective_action: String,
    pub responsibility: String,
    pub timeline: String,
    pub evidence: String,
}

impl From<TrackRow> for FfiTrackRow {
    fn from(row: TrackRow) -> Self {
        Self {
            desired_date: row.desired_date,
            desired_time: row.desired_time,
            desired_tat: row.desired_tat,
            actual_date: row.actual_date,
            actual_time: row.actual_time,
            actual_tat: row.actual_tat,
            variance_tat: row.variance_tat,
            gaps_identified: row.gaps_identified,
            corrective_action: row.corrective_action,
            responsibility: row.responsibility,
            timeline: row.timeline,
            evidence: row.evidence,
        }
    }
}

impl From<FfiTrackRow> for TrackRow {
    fn from(row: FfiTrackRow) -> Self {
        Self {
            desired_date: row.desired_date,
            desired_time: row.desired_time,
            desired_tat: row.desired_tat,
            actual_date: row.actual_date,
            actual_time: row.actual_time,
            actual_tat: row.actual_tat,
            variance_tat: row.variance_tat,
            gaps_identified: row.gaps_identified,
            corrective_action: row.corrective_action,
            responsibility: row.responsibility,
            timeline: row.timeline,
            evidence: row.evidence,
        }
    }
}

/// FFI-safe snapshot of the open form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTrackSheet {
    pub header: FfiPatientHeader,
    /// Service names in catalog order; `rows` is aligned to this.
    pub services: Vec<String>,
    pub rows: Vec<FfiTrackRow>,
}

/// FFI-safe saved record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientRecord {
    pub id: String,
    pub header: FfiPatientHeader,
    /// Rows in the catalog order in effect when the record was saved.
    pub rows: Vec<FfiTrackRow>,
    pub saved_at: String,
}

impl From<PatientRecord> for FfiPatientRecord {
    fn from(record: PatientRecord) -> Self {
        Self {
            id: record.id,
            header: record.header.into(),
            rows: record.data.rows().iter().cloned().map(Into::into).collect(),
            saved_at: record.saved_at,
        }
    }
}

/// FFI-safe report cell.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReportCell {
    pub actual_date: Option<String>,
    pub variance: Option<String>,
    /// Category label for the variance, when present.
    pub status: Option<String>,
}

impl From<ServiceCell> for FfiReportCell {
    fn from(cell: ServiceCell) -> Self {
        let (variance, status) = match cell.variance {
            Some(tag) => (Some(tag.value), Some(tag.status.label().to_string())),
            None => (None, None),
        };
        Self {
            actual_date: cell.actual_date,
            variance,
            status,
        }
    }
}

/// FFI-safe report row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReportRow {
    pub record_id: String,
    pub patient_name: String,
    pub mrn: String,
    pub cells: Vec<FfiReportCell>,
}

impl From<ReportRow> for FfiReportRow {
    fn from(row: ReportRow) -> Self {
        Self {
            record_id: row.record_id,
            patient_name: row.patient_name,
            mrn: row.mrn,
            cells: row.cells.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-safe report matrix.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProcessSheet {
    pub services: Vec<String>,
    pub rows: Vec<FfiReportRow>,
    /// Fixed header columns plus one per service.
    pub column_count: u32,
}

impl From<ProcessSheet> for FfiProcessSheet {
    fn from(sheet: ProcessSheet) -> Self {
        let column_count = sheet.column_count() as u32;
        Self {
            services: sheet.services,
            rows: sheet.rows.into_iter().map(Into::into).collect(),
            column_count,
        }
    }
}
