//! Saved patient records.

use serde::{Deserialize, Serialize};

use super::header::PatientHeader;
use super::sheet::TrackSheet;

/// A completed track sheet.
///
/// Immutable once saved: the store only appends, and nothing hands out
/// mutable access afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Unique record ID
    pub id: String,
    /// Patient header as entered
    pub header: PatientHeader,
    /// Per-service rows in catalog order
    pub data: TrackSheet,
    /// Creation timestamp
    pub saved_at: String,
}

impl PatientRecord {
    /// Package a header and sheet under a fresh id and the current time.
    pub fn new(header: PatientHeader, data: TrackSheet) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            header,
            data,
            saved_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
