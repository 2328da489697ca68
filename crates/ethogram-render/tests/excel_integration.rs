//! Integration tests for Excel rendering

use chrono::NaiveDate;
use ethogram_core::{ObservationMode, ObservationRecord, Renderer, SubjectObservation, TimeSlotMap};
use ethogram_render::{render_report, CellStyle, EmailRenderer, ExcelRenderer};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn record(start: &str, end: &str, time_slots: TimeSlotMap) -> ObservationRecord {
    ObservationRecord {
        id: Some("8f14e45f".into()),
        observer_name: "Maria Rossi".into(),
        observation_date: date(2025, 11, 29),
        start_time: start.into(),
        end_time: end.into(),
        aviary: "Sayyida's Cove".into(),
        patient: "Sayyida".into(),
        mode: ObservationMode::Live,
        babies_present: 2,
        environmental_notes: Some("Heavy rain after 23:00".into()),
        time_slots,
        emails: vec!["maria@example.com".into()],
    }
}

/// A full hour of observations, one every slot
fn create_hour_session() -> ObservationRecord {
    let behaviors = [
        "resting_alert",
        "preening",
        "preening",
        "flying",
        "eating_food_platform",
        "walking_perch",
        "vocalizing",
        "resting_not_alert",
        "drinking",
        "interacting_object",
        "not_visible",
        "other",
        "resting_alert",
    ];

    let mut slots = TimeSlotMap::new();
    for (i, behavior) in behaviors.iter().enumerate() {
        let minutes = i * 5;
        let key = format!("{:02}:{:02}", 14 + minutes / 60, minutes % 60);
        let observation = match *behavior {
            "interacting_object" => SubjectObservation::new(*behavior).object("other", "Pine cone"),
            "other" => SubjectObservation::new(*behavior).description("Wing stretching"),
            _ => SubjectObservation::new(*behavior).location("perch 3"),
        };
        slots.insert(key, observation);
    }

    record("14:00", "15:00", slots)
}

#[test]
fn render_hour_session_to_excel() {
    let record = create_hour_session();
    let matrix = record.matrix();

    assert_eq!(matrix.columns.len(), 13);
    assert_eq!(matrix.cells().len(), 13);
    assert!(matrix.diagnostics.is_clean());

    let xlsx = ExcelRenderer::new().render(&record, &matrix).unwrap();

    // Verify it's a valid XLSX file (starts with PK zip signature)
    assert!(xlsx.len() > 100);
    assert_eq!(&xlsx[0..2], b"PK");

    // Write to file for inspection (uncomment for local testing)
    // std::fs::write("/tmp/ethogram_hour.xlsx", &xlsx).unwrap();
}

#[test]
fn hour_session_layout_places_resolved_text() {
    let record = create_hour_session();
    let cells = ExcelRenderer::new().layout(&record, &record.matrix());

    let object_cell = cells
        .iter()
        .find(|c| c.style == CellStyle::Observation && c.text.contains("Object:"))
        .unwrap();
    assert_eq!(object_cell.text, "x\nObject: Pine cone");
    // interacting_object is row 16 of the catalog, slot 9 is column J
    assert_eq!((object_cell.row, object_cell.col), (4 + 16, 1 + 9));

    let last_header = cells
        .iter()
        .filter(|c| c.style == CellStyle::SlotHeader)
        .last()
        .unwrap();
    assert_eq!(last_header.text, "1:00");
}

#[test]
fn render_midnight_session() {
    let mut slots = TimeSlotMap::new();
    slots.insert("23:55", SubjectObservation::new("preening"));
    slots.insert("00:00", SubjectObservation::new("drinking"));
    let record = record("23:55", "00:05", slots);

    let report = render_report(&record, &ExcelRenderer::new()).unwrap();

    assert_eq!(report.filename, "ethogram-Sayyida-2025-11-29.xlsx");
    assert_eq!(&report.bytes[0..2], b"PK");
    assert!(report.diagnostics.is_clean());
}

#[test]
fn render_report_surfaces_dropped_slots() {
    let mut slots = TimeSlotMap::new();
    slots.insert("10:00", SubjectObservation::new("bathing"));
    slots.insert("10:02", SubjectObservation::new("bathing"));
    slots.insert("11:30", SubjectObservation::new("nesting"));
    let record = record("10:00", "10:30", slots);

    let report = render_report(&record, &ExcelRenderer::new()).unwrap();

    assert_eq!(report.diagnostics.dropped_slot_keys, vec!["10:02", "11:30"]);
    assert!(report.bytes.len() > 100);
}

#[test]
fn empty_session_still_renders() {
    let record = record("09:00", "09:00", TimeSlotMap::new());
    let matrix = record.matrix();
    assert_eq!(matrix.column_labels(), vec!["0:00"]);

    let xlsx = ExcelRenderer::new().render(&record, &matrix).unwrap();
    assert_eq!(&xlsx[0..2], b"PK");
}

#[test]
fn one_workbook_for_every_recipient() {
    let mut record = create_hour_session();
    record.emails.push("lead@example.com".into());

    let report = render_report(&record, &ExcelRenderer::new()).unwrap();
    let size = report.bytes.len();
    let email = EmailRenderer::new()
        .render(&record)
        .attach(report.filename.clone(), report.bytes);

    assert_eq!(email.recipients.len(), 2);
    let attachment = email.attachment.unwrap();
    assert_eq!(attachment.filename, report.filename);
    assert_eq!(attachment.content.len(), size);
}
