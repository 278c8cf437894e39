//! End-to-end tracking flow tests.

use track_sheet_core::app::{AppController, AppError, View};
use track_sheet_core::models::{HeaderField, RowField, ServiceCatalog};
use track_sheet_core::report::{ProcessSheet, ScheduleStatus};
use track_sheet_core::store::{MemorySlot, StorageSlot, StoreError, StoreResult};

fn catalog() -> ServiceCatalog {
    ServiceCatalog::new(vec!["Lab".into(), "Radiology".into()])
}

fn controller() -> AppController {
    AppController::new(catalog(), Box::new(MemorySlot::new()))
}

fn lab_id(app: &AppController) -> track_sheet_core::models::ServiceId {
    app.service_id("Lab").unwrap()
}

#[test]
fn test_jane_doe_scenario() {
    let mut app = controller();
    app.open_track_sheet();

    app.set_header_field(HeaderField::Name, "Jane Doe".into()).unwrap();
    let lab = lab_id(&app);
    app.set_row_field(lab, RowField::DesiredTat, "30".into()).unwrap();
    app.set_row_field(lab, RowField::ActualDate, "2024-03-01".into()).unwrap();
    let row = app.set_row_field(lab, RowField::ActualTat, "45".into()).unwrap();
    assert_eq!(row.variance_tat, "-15");

    app.save_record().unwrap();

    // Stored record carries the computed variance.
    let record = &app.records()[0];
    let lab_row = record.data.row(lab).unwrap();
    assert_eq!(lab_row.variance_tat, "-15");

    // Report shows the actual date and a behind-schedule tag in the Lab
    // column of Jane Doe's row.
    let sheet = app.process_sheet();
    let report_row = &sheet.rows[0];
    assert_eq!(report_row.patient_name, "Jane Doe");
    let cell = &report_row.cells[lab.index()];
    assert_eq!(cell.actual_date.as_deref(), Some("2024-03-01"));
    let tag = cell.variance.as_ref().unwrap();
    assert_eq!(tag.value, "-15");
    assert_eq!(tag.status, ScheduleStatus::Behind);
}

#[test]
fn test_sequential_saves_keep_order_and_distinct_ids() {
    let mut app = controller();

    for i in 0..5 {
        app.open_track_sheet();
        app.set_header_field(HeaderField::Name, format!("Patient {}", i)).unwrap();
        app.save_record().unwrap();
    }

    let records = app.records();
    assert_eq!(records.len(), 5);

    let names: Vec<&str> = records.iter().map(|r| r.header.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Patient 0", "Patient 1", "Patient 2", "Patient 3", "Patient 4"]
    );

    let ids: std::collections::HashSet<&str> =
        records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids.len(), 5);
}

#[test]
fn test_report_dimensions_match_catalog() {
    let mut app = controller();

    let empty = app.process_sheet();
    assert!(empty.rows.is_empty());
    assert_eq!(empty.column_count(), 4);

    for _ in 0..3 {
        app.open_track_sheet();
        app.save_record().unwrap();
    }

    let sheet = app.process_sheet();
    assert_eq!(sheet.rows.len(), 3);
    for row in &sheet.rows {
        assert_eq!(2 + row.cells.len(), sheet.column_count());
    }
}

#[test]
fn test_variance_edits_are_row_local() {
    let mut app = controller();
    app.open_track_sheet();

    let lab = lab_id(&app);
    let radiology = app.service_id("Radiology").unwrap();

    app.set_row_field(radiology, RowField::DesiredTat, "10".into()).unwrap();
    app.set_row_field(radiology, RowField::ActualTat, "4".into()).unwrap();
    app.set_row_field(lab, RowField::DesiredTat, "30".into()).unwrap();

    let form = app.form().unwrap();
    assert_eq!(form.sheet().row(radiology).unwrap().variance_tat, "6");
    assert_eq!(form.sheet().row(lab).unwrap().variance_tat, "");
}

#[test]
fn test_back_then_view_records_round_trip() {
    let mut app = controller();

    app.open_track_sheet();
    app.set_header_field(HeaderField::Name, "Discarded".into()).unwrap();
    app.back();

    app.open_process_sheet();
    assert_eq!(app.view(), View::ProcessSheet);
    assert!(app.records().is_empty());

    app.back();
    assert_eq!(app.view(), View::Home);
}

#[test]
fn test_empty_header_and_rows_save_fine() {
    let mut app = controller();
    app.open_track_sheet();

    let id = app.save_record().unwrap();
    let record = &app.records()[0];
    assert_eq!(record.id, id);
    assert!(record.header.name.is_empty());
    assert!(record.data.rows().iter().all(|r| r.variance_tat.is_empty()));

    // All cells of the report row render empty.
    let sheet = app.process_sheet();
    assert!(sheet.rows[0].cells.iter().all(|c| c.is_empty()));
}

struct FailingSlot;

impl StorageSlot for FailingSlot {
    fn read(&self) -> StoreResult<Option<String>> {
        Ok(None)
    }

    fn write(&self, _blob: &str) -> StoreResult<()> {
        Err(StoreError::Backend("device out of space".into()))
    }
}

#[test]
fn test_write_failure_surfaces_but_record_survives_in_memory() {
    let mut app = AppController::new(catalog(), Box::new(FailingSlot));

    app.open_track_sheet();
    app.set_header_field(HeaderField::Name, "Jane Doe".into()).unwrap();

    let result = app.save_record();
    assert!(matches!(result, Err(AppError::Form(_))));

    // Save landed in memory and the session stays usable.
    assert_eq!(app.view(), View::Home);
    assert_eq!(app.records().len(), 1);
    assert_eq!(app.process_sheet().rows.len(), 1);
}

#[test]
fn test_csv_and_html_cover_all_records() {
    let mut app = controller();
    for name in ["Alice", "Bob"] {
        app.open_track_sheet();
        app.set_header_field(HeaderField::Name, name.into()).unwrap();
        let lab = lab_id(&app);
        app.set_row_field(lab, RowField::DesiredTat, "60".into()).unwrap();
        app.set_row_field(lab, RowField::ActualTat, "30".into()).unwrap();
        app.save_record().unwrap();
    }

    let csv = app.export_csv();
    assert!(csv.contains("Alice"));
    assert!(csv.contains("Bob"));
    assert!(csv.starts_with("patient_name,mrn,Lab,Radiology\n"));

    app.open_process_sheet();
    let html = app.printable().unwrap();
    assert!(html.contains("Alice"));
    assert!(html.contains("Bob"));
    assert!(html.contains("Ahead of schedule"));
}

#[test]
fn test_report_builds_standalone_from_records() {
    let mut app = controller();
    app.open_track_sheet();
    app.save_record().unwrap();

    let sheet = ProcessSheet::build(app.records(), app.catalog());
    assert_eq!(sheet.rows.len(), 1);
    assert_eq!(sheet.services, vec!["Lab".to_string(), "Radiology".to_string()]);
}
