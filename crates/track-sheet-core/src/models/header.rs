//! Patient header models.

use serde::{Deserialize, Serialize};

/// Header block of a track sheet: who the sheet is about and when it was
/// reported. All fields are free text with empty-string defaults; nothing is
/// validated and the MRN carries no uniqueness constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientHeader {
    /// Patient name
    pub name: String,
    /// Medical record number
    pub mrn: String,
    /// Reporting date (ISO date string)
    pub reporting_date: String,
    /// Reporting time
    pub reporting_time: String,
}

/// Addressable fields of a [`PatientHeader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Name,
    Mrn,
    ReportingDate,
    ReportingTime,
}

impl HeaderField {
    /// Parse a field key as used by hosts and the persisted wire format.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "name" => Some(Self::Name),
            "mrn" => Some(Self::Mrn),
            "reportingDate" => Some(Self::ReportingDate),
            "reportingTime" => Some(Self::ReportingTime),
            _ => None,
        }
    }

    /// Stable string key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Mrn => "mrn",
            Self::ReportingDate => "reportingDate",
            Self::ReportingTime => "reportingTime",
        }
    }
}

impl PatientHeader {
    /// Header for a freshly opened sheet: today's local date pre-filled,
    /// everything else empty.
    pub fn for_today() -> Self {
        Self {
            reporting_date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    /// Replace one attribute. No validation by design.
    pub fn set(&mut self, field: HeaderField, value: String) {
        match field {
            HeaderField::Name => self.name = value,
            HeaderField::Mrn => self.mrn = value,
            HeaderField::ReportingDate => self.reporting_date = value,
            HeaderField::ReportingTime => self.reporting_time = value,
        }
    }

    /// Current value of one attribute.
    pub fn get(&self, field: HeaderField) -> &str {
        match field {
            HeaderField::Name => &self.name,
            HeaderField::Mrn => &self.mrn,
            HeaderField::ReportingDate => &self.reporting_date,
            HeaderField::ReportingTime => &self.reporting_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_today_prefills_date_only() {
        let header = PatientHeader::for_today();
        assert_eq!(header.reporting_date.len(), 10); // YYYY-MM-DD
        assert!(header.name.is_empty());
        assert!(header.mrn.is_empty());
        assert!(header.reporting_time.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut header = PatientHeader::default();
        header.set(HeaderField::Name, "Jane Doe".into());
        header.set(HeaderField::Mrn, "000123".into());

        assert_eq!(header.get(HeaderField::Name), "Jane Doe");
        assert_eq!(header.get(HeaderField::Mrn), "000123");
    }

    #[test]
    fn test_field_keys_round_trip() {
        for field in [
            HeaderField::Name,
            HeaderField::Mrn,
            HeaderField::ReportingDate,
            HeaderField::ReportingTime,
        ] {
            assert_eq!(HeaderField::from_key(field.key()), Some(field));
        }
        assert_eq!(HeaderField::from_key("species"), None);
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let header = PatientHeader {
            name: "Jane".into(),
            mrn: "1".into(),
            reporting_date: "2024-03-01".into(),
            reporting_time: "09:00".into(),
        };
        let json = serde_json::to_string(&header).unwrap();
        assert!(json.contains("\"reportingDate\""));
        assert!(json.contains("\"reportingTime\""));
    }
}
