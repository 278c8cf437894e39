//! Screen navigation and the save flow.
//!
//! Single-threaded by contract: every operation runs to completion in
//! response to one host event, so a field update and its variance
//! recomputation are never interleaved with another event.

use thiserror::Error;
use tracing::info;

use crate::form::{FormError, TrackSheetForm};
use crate::models::{
    HeaderField, PatientRecord, RowField, ServiceCatalog, ServiceId, TrackRow,
};
use crate::report::{self, ProcessSheet};
use crate::store::{RecordStore, StorageSlot};

/// The three screens of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Landing screen: "create new track" / "view records"
    Home,
    /// Input form for one patient
    TrackSheet,
    /// Cross-patient report
    ProcessSheet,
}

/// Controller errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("No track sheet is open")]
    NoActiveSheet,

    #[error("Nothing printable on this screen")]
    NothingToPrint,
}

pub type AppResult<T> = Result<T, AppError>;

/// Owns the catalog, the record store, and whichever screen is active.
pub struct AppController {
    catalog: ServiceCatalog,
    store: RecordStore,
    view: View,
    form: Option<TrackSheetForm>,
}

impl AppController {
    /// Load persisted records from the slot and land on the home screen.
    pub fn new(catalog: ServiceCatalog, slot: Box<dyn StorageSlot>) -> Self {
        Self {
            catalog,
            store: RecordStore::load(slot),
            view: View::Home,
            form: None,
        }
    }

    /// Active screen.
    pub fn view(&self) -> View {
        self.view
    }

    /// The service catalog shared by form and report.
    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Saved records in save order.
    pub fn records(&self) -> &[PatientRecord] {
        self.store.list()
    }

    /// The open form, if the track-sheet screen is active.
    pub fn form(&self) -> Option<&TrackSheetForm> {
        self.form.as_ref()
    }

    /// "Create new track": open a fresh form.
    pub fn open_track_sheet(&mut self) {
        self.form = Some(TrackSheetForm::new(&self.catalog));
        self.view = View::TrackSheet;
    }

    /// "View records".
    pub fn open_process_sheet(&mut self) {
        self.view = View::ProcessSheet;
    }

    /// Back to the landing screen. Any in-progress edits are dropped; the
    /// accepted worst case is losing exactly those.
    pub fn back(&mut self) {
        self.form = None;
        self.view = View::Home;
    }

    /// Resolve a service name against the catalog.
    pub fn service_id(&self, name: &str) -> Option<ServiceId> {
        self.catalog.id_of(name)
    }

    fn form_mut(&mut self) -> AppResult<&mut TrackSheetForm> {
        self.form.as_mut().ok_or(AppError::NoActiveSheet)
    }

    /// Update one header field of the open form.
    pub fn set_header_field(&mut self, field: HeaderField, value: String) -> AppResult<()> {
        self.form_mut()?.set_header_field(field, value);
        Ok(())
    }

    /// Update one row field of the open form; returns the updated row with
    /// its recomputed variance.
    pub fn set_row_field(
        &mut self,
        service: ServiceId,
        field: RowField,
        value: String,
    ) -> AppResult<TrackRow> {
        let row = self.form_mut()?.set_row_field(service, field, value)?;
        Ok(row.clone())
    }

    /// Save the open form and navigate home.
    ///
    /// The form is consumed either way: when only the slot write fails the
    /// record is already in the in-memory list, and the error is returned so
    /// the host can raise a non-blocking notification instead of losing the
    /// save silently.
    pub fn save_record(&mut self) -> AppResult<String> {
        let form = self.form.take().ok_or(AppError::NoActiveSheet)?;
        self.view = View::Home;

        let id = form.submit(&mut self.store)?;
        info!(record_id = %id, "track sheet saved");
        Ok(id)
    }

    /// Report matrix over everything saved so far.
    pub fn process_sheet(&self) -> ProcessSheet {
        ProcessSheet::build(self.store.list(), &self.catalog)
    }

    /// Printable rendering of the active screen for the host's native print
    /// flow.
    pub fn printable(&self) -> AppResult<String> {
        match self.view {
            View::TrackSheet => {
                let form = self.form.as_ref().ok_or(AppError::NoActiveSheet)?;
                Ok(report::track_sheet_html(
                    form.header(),
                    form.sheet(),
                    &self.catalog,
                ))
            }
            View::ProcessSheet => Ok(report::process_sheet_html(&self.process_sheet())),
            View::Home => Err(AppError::NothingToPrint),
        }
    }

    /// CSV export of the report matrix.
    pub fn export_csv(&self) -> String {
        report::process_sheet_csv(&self.process_sheet())
    }
}
