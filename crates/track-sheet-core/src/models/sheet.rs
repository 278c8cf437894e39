//! Track sheet rows and the variance rule.

use serde::{Deserialize, Serialize};

use super::catalog::{ServiceCatalog, ServiceId};

/// One service's timeline: desired vs. actual delivery, the derived
/// turn-around-time variance, and the free-text analysis columns.
///
/// TAT fields hold numeric strings (minutes) exactly as typed; parsing only
/// happens when the variance is recomputed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackRow {
    pub desired_date: String,
    pub desired_time: String,
    pub desired_tat: String,
    pub actual_date: String,
    pub actual_time: String,
    pub actual_tat: String,
    /// Derived: desired TAT minus actual TAT, empty unless both parse.
    pub variance_tat: String,
    pub gaps_identified: String,
    pub corrective_action: String,
    pub responsibility: String,
    pub timeline: String,
    pub evidence: String,
}

/// Addressable fields of a [`TrackRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    DesiredDate,
    DesiredTime,
    DesiredTat,
    ActualDate,
    ActualTime,
    ActualTat,
    VarianceTat,
    GapsIdentified,
    CorrectiveAction,
    Responsibility,
    Timeline,
    Evidence,
}

impl RowField {
    /// Parse a field key as used by hosts and the persisted wire format.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "desiredDate" => Some(Self::DesiredDate),
            "desiredTime" => Some(Self::DesiredTime),
            "desiredTat" => Some(Self::DesiredTat),
            "actualDate" => Some(Self::ActualDate),
            "actualTime" => Some(Self::ActualTime),
            "actualTat" => Some(Self::ActualTat),
            "varianceTat" => Some(Self::VarianceTat),
            "gapsIdentified" => Some(Self::GapsIdentified),
            "correctiveAction" => Some(Self::CorrectiveAction),
            "responsibility" => Some(Self::Responsibility),
            "timeline" => Some(Self::Timeline),
            "evidence" => Some(Self::Evidence),
            _ => None,
        }
    }

    /// Stable string key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::DesiredDate => "desiredDate",
            Self::DesiredTime => "desiredTime",
            Self::DesiredTat => "desiredTat",
            Self::ActualDate => "actualDate",
            Self::ActualTime => "actualTime",
            Self::ActualTat => "actualTat",
            Self::VarianceTat => "varianceTat",
            Self::GapsIdentified => "gapsIdentified",
            Self::CorrectiveAction => "correctiveAction",
            Self::Responsibility => "responsibility",
            Self::Timeline => "timeline",
            Self::Evidence => "evidence",
        }
    }
}

impl TrackRow {
    /// Replace one attribute, recomputing the variance when a TAT operand
    /// changed. Setting `VarianceTat` directly is allowed and sticks until
    /// the next TAT edit overwrites it.
    pub fn set(&mut self, field: RowField, value: String) {
        match field {
            RowField::DesiredDate => self.desired_date = value,
            RowField::DesiredTime => self.desired_time = value,
            RowField::DesiredTat => self.desired_tat = value,
            RowField::ActualDate => self.actual_date = value,
            RowField::ActualTime => self.actual_time = value,
            RowField::ActualTat => self.actual_tat = value,
            RowField::VarianceTat => self.variance_tat = value,
            RowField::GapsIdentified => self.gaps_identified = value,
            RowField::CorrectiveAction => self.corrective_action = value,
            RowField::Responsibility => self.responsibility = value,
            RowField::Timeline => self.timeline = value,
            RowField::Evidence => self.evidence = value,
        }

        if matches!(field, RowField::DesiredTat | RowField::ActualTat) {
            self.recompute_variance();
        }
    }

    /// Current value of one attribute.
    pub fn get(&self, field: RowField) -> &str {
        match field {
            RowField::DesiredDate => &self.desired_date,
            RowField::DesiredTime => &self.desired_time,
            RowField::DesiredTat => &self.desired_tat,
            RowField::ActualDate => &self.actual_date,
            RowField::ActualTime => &self.actual_time,
            RowField::ActualTat => &self.actual_tat,
            RowField::VarianceTat => &self.variance_tat,
            RowField::GapsIdentified => &self.gaps_identified,
            RowField::CorrectiveAction => &self.corrective_action,
            RowField::Responsibility => &self.responsibility,
            RowField::Timeline => &self.timeline,
            RowField::Evidence => &self.evidence,
        }
    }

    /// Variance rule: desired TAT minus actual TAT when both parse, empty
    /// string otherwise. A parse failure is a silent reset, not an error.
    fn recompute_variance(&mut self) {
        self.variance_tat = match (parse_tat(&self.desired_tat), parse_tat(&self.actual_tat)) {
            (Some(desired), Some(actual)) => (desired - actual).to_string(),
            _ => String::new(),
        };
    }
}

/// Parse a TAT field. Empty or non-numeric input means "absent".
pub(crate) fn parse_tat(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// One [`TrackRow`] per catalog service, in catalog order.
///
/// Catalog membership is closed: rows exist only at catalog positions, and
/// every position has a row from initialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackSheet {
    rows: Vec<TrackRow>,
}

impl TrackSheet {
    /// Empty sheet with one default row per catalog entry.
    pub fn for_catalog(catalog: &ServiceCatalog) -> Self {
        Self {
            rows: vec![TrackRow::default(); catalog.len()],
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the sheet has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in catalog order.
    pub fn rows(&self) -> &[TrackRow] {
        &self.rows
    }

    /// Row for a service. `None` only for an id minted by a larger catalog,
    /// e.g. when reporting over records saved under an older configuration.
    pub fn row(&self, service: ServiceId) -> Option<&TrackRow> {
        self.rows.get(service.index())
    }

    /// Mutable row for a service.
    pub fn row_mut(&mut self, service: ServiceId) -> Option<&mut TrackRow> {
        self.rows.get_mut(service.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_variance_recomputed_on_either_tat_edit() {
        let mut row = TrackRow::default();

        row.set(RowField::DesiredTat, "30".into());
        assert_eq!(row.variance_tat, "");

        row.set(RowField::ActualTat, "45".into());
        assert_eq!(row.variance_tat, "-15");

        row.set(RowField::DesiredTat, "60".into());
        assert_eq!(row.variance_tat, "15");
    }

    #[test]
    fn test_variance_cleared_on_parse_failure() {
        let mut row = TrackRow::default();
        row.set(RowField::DesiredTat, "30".into());
        row.set(RowField::ActualTat, "45".into());
        assert_eq!(row.variance_tat, "-15");

        row.set(RowField::ActualTat, "soon".into());
        assert_eq!(row.variance_tat, "");

        row.set(RowField::ActualTat, "45".into());
        row.set(RowField::DesiredTat, "".into());
        assert_eq!(row.variance_tat, "");
    }

    #[test]
    fn test_variance_handles_fractions_and_whitespace() {
        let mut row = TrackRow::default();
        row.set(RowField::DesiredTat, " 2.5 ".into());
        row.set(RowField::ActualTat, "1".into());
        assert_eq!(row.variance_tat, "1.5");
    }

    #[test]
    fn test_non_tat_edits_leave_variance_alone() {
        let mut row = TrackRow::default();
        row.set(RowField::DesiredTat, "30".into());
        row.set(RowField::ActualTat, "10".into());
        assert_eq!(row.variance_tat, "20");

        row.set(RowField::GapsIdentified, "late sample pickup".into());
        row.set(RowField::ActualDate, "2024-03-01".into());
        assert_eq!(row.variance_tat, "20");
    }

    #[test]
    fn test_variance_settable_directly() {
        let mut row = TrackRow::default();
        row.set(RowField::VarianceTat, "-5".into());
        assert_eq!(row.variance_tat, "-5");
    }

    #[test]
    fn test_parse_tat_rejects_non_finite() {
        assert_eq!(parse_tat("NaN"), None);
        assert_eq!(parse_tat("inf"), None);
        assert_eq!(parse_tat(""), None);
        assert_eq!(parse_tat("12"), Some(12.0));
    }

    #[test]
    fn test_sheet_seeded_per_catalog_entry() {
        let catalog = ServiceCatalog::new(vec!["Lab".into(), "Radiology".into()]);
        let sheet = TrackSheet::for_catalog(&catalog);

        assert_eq!(sheet.len(), 2);
        for id in catalog.ids() {
            assert_eq!(sheet.row(id).unwrap(), &TrackRow::default());
        }
    }

    #[test]
    fn test_row_field_keys_round_trip() {
        for field in [
            RowField::DesiredDate,
            RowField::DesiredTime,
            RowField::DesiredTat,
            RowField::ActualDate,
            RowField::ActualTime,
            RowField::ActualTat,
            RowField::VarianceTat,
            RowField::GapsIdentified,
            RowField::CorrectiveAction,
            RowField::Responsibility,
            RowField::Timeline,
            RowField::Evidence,
        ] {
            assert_eq!(RowField::from_key(field.key()), Some(field));
        }
        assert_eq!(RowField::from_key("dose"), None);
    }

    proptest! {
        #[test]
        fn prop_variance_is_desired_minus_actual(desired in -10_000i32..10_000, actual in -10_000i32..10_000) {
            let mut row = TrackRow::default();
            row.set(RowField::DesiredTat, desired.to_string());
            row.set(RowField::ActualTat, actual.to_string());

            let expected = f64::from(desired) - f64::from(actual);
            prop_assert_eq!(&row.variance_tat, &expected.to_string());
        }

        #[test]
        fn prop_blank_operand_always_clears(desired in -10_000i32..10_000) {
            let mut row = TrackRow::default();
            row.set(RowField::DesiredTat, desired.to_string());
            row.set(RowField::ActualTat, "5".into());
            row.set(RowField::ActualTat, String::new());
            prop_assert_eq!(&row.variance_tat, "");
        }
    }
}
