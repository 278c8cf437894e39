//! Input form: one patient's in-progress track sheet and the save path.

use thiserror::Error;

use crate::models::{
    HeaderField, PatientHeader, PatientRecord, RowField, ServiceCatalog, ServiceId, TrackRow,
    TrackSheet,
};
use crate::store::{RecordStore, StoreError};

/// Form errors. Apart from the storage passthrough these are
/// programming-contract violations: they cannot arise from normal user
/// input, only from a host driving the API with a stale service id.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Service index {index} outside catalog of {len} entries")]
    ServiceOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type FormResult<T> = Result<T, FormError>;

/// Mutable track-sheet state: header fields plus one row per catalog
/// service, seeded empty at creation. All updates are field-level and
/// synchronous; the variance rule runs inside [`TrackRow::set`].
pub struct TrackSheetForm {
    header: PatientHeader,
    sheet: TrackSheet,
}

impl TrackSheetForm {
    /// Fresh form: today's reporting date, one empty row per catalog entry.
    pub fn new(catalog: &ServiceCatalog) -> Self {
        Self {
            header: PatientHeader::for_today(),
            sheet: TrackSheet::for_catalog(catalog),
        }
    }

    /// Header as currently entered.
    pub fn header(&self) -> &PatientHeader {
        &self.header
    }

    /// Sheet as currently entered.
    pub fn sheet(&self) -> &TrackSheet {
        &self.sheet
    }

    /// Replace one header attribute. No validation by design: empty fields
    /// are acceptable all the way to save time.
    pub fn set_header_field(&mut self, field: HeaderField, value: String) {
        self.header.set(field, value);
    }

    /// Replace one row attribute, recomputing that row's variance when a TAT
    /// operand changed. Returns the updated row so callers can re-render it.
    pub fn set_row_field(
        &mut self,
        service: ServiceId,
        field: RowField,
        value: String,
    ) -> FormResult<&TrackRow> {
        let len = self.sheet.len();
        debug_assert!(service.index() < len, "service id from a foreign catalog");

        let row = self
            .sheet
            .row_mut(service)
            .ok_or(FormError::ServiceOutOfRange {
                index: service.index(),
                len,
            })?;
        row.set(field, value);
        Ok(&*row)
    }

    /// Package the form into an immutable [`PatientRecord`] and hand it to
    /// the store. Returns the saved record's id; the caller discards the
    /// form (consumed here) and navigates away.
    pub fn submit(self, store: &mut RecordStore) -> FormResult<String> {
        let record = PatientRecord::new(self.header, self.sheet);
        let id = record.id.clone();
        store.append(record)?;
        Ok(id)
    }
}
