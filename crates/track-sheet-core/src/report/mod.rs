//! Process sheet: the cross-patient report matrix.

mod render;
pub use render::*;

use crate::models::{parse_tat, PatientRecord, ServiceCatalog, TrackRow};

/// Whether a service was delivered inside its time budget. Variance is
/// desired TAT minus actual TAT, so a strictly positive value means the
/// service came in faster than desired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleStatus {
    Ahead,
    Behind,
}

impl ScheduleStatus {
    /// Category for a variance value: `Ahead` iff strictly positive.
    pub fn for_variance(variance: f64) -> Self {
        if variance > 0.0 {
            Self::Ahead
        } else {
            Self::Behind
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ahead => "Ahead of schedule",
            Self::Behind => "Behind or on schedule",
        }
    }
}

/// Variance value as stored on the row, tagged with its category.
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceTag {
    pub value: String,
    pub status: ScheduleStatus,
}

/// One service cell: the actual delivery date and the tagged variance,
/// either of which may be absent. A cell with neither renders empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceCell {
    pub actual_date: Option<String>,
    pub variance: Option<VarianceTag>,
}

impl ServiceCell {
    fn from_row(row: &TrackRow) -> Self {
        let actual_date = (!row.actual_date.is_empty()).then(|| row.actual_date.clone());

        let variance = (!row.variance_tat.is_empty()).then(|| {
            // A hand-edited, unparseable variance gets the non-positive
            // category rather than disappearing from the report.
            let status = match parse_tat(&row.variance_tat) {
                Some(v) => ScheduleStatus::for_variance(v),
                None => ScheduleStatus::Behind,
            };
            VarianceTag {
                value: row.variance_tat.clone(),
                status,
            }
        });

        Self {
            actual_date,
            variance,
        }
    }

    /// True when the cell shows nothing.
    pub fn is_empty(&self) -> bool {
        self.actual_date.is_none() && self.variance.is_none()
    }
}

/// One report row: a saved record flattened against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub record_id: String,
    pub patient_name: String,
    pub mrn: String,
    /// One cell per catalog service, in catalog order.
    pub cells: Vec<ServiceCell>,
}

impl ReportRow {
    fn build(record: &PatientRecord, catalog: &ServiceCatalog) -> Self {
        let cells = catalog
            .ids()
            .map(|id| match record.data.row(id) {
                Some(row) => ServiceCell::from_row(row),
                // Record saved under a shorter catalog than today's.
                None => ServiceCell::default(),
            })
            .collect();

        Self {
            record_id: record.id.clone(),
            patient_name: record.header.name.clone(),
            mrn: record.header.mrn.clone(),
            cells,
        }
    }
}

/// The full matrix: rows = records in store order, columns = patient name
/// and MRN followed by one column per catalog service.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSheet {
    pub services: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl ProcessSheet {
    /// Build the matrix over every saved record, unconditionally: no
    /// filtering, sorting, or pagination.
    pub fn build(records: &[PatientRecord], catalog: &ServiceCatalog) -> Self {
        Self {
            services: catalog.names().to_vec(),
            rows: records.iter().map(|r| ReportRow::build(r, catalog)).collect(),
        }
    }

    /// Total column count: the two fixed header columns plus one per
    /// service.
    pub fn column_count(&self) -> usize {
        2 + self.services.len()
    }
}
