//! Integration tests for the full sweep workflow.
//!
//! These tests run the complete pipeline on fixture files and verify the
//! end-to-end results, including round-trips through both export formats.

use std::path::PathBuf;
use sweeper::error::SweeperError;
use sweeper::exporter::ExportFormat;
use sweeper::loader::{load_table, FileFormat, UploadedFile};
use sweeper::orchestrator::{self, Action, SweepOptions};
use sweeper::session::SessionState;

fn fixture(name: &str) -> UploadedFile {
    let path = PathBuf::from("testdata").join(name);
    UploadedFile::from_path(&path).expect("fixture should load")
}

#[test]
fn test_sweep_clean_fixture() {
    let mut state = SessionState::new();
    let options = SweepOptions {
        remove_duplicates: true,
        fill_missing: true,
        format: Some(ExportFormat::Csv),
        ..Default::default()
    };

    let outcome =
        orchestrator::sweep_file(&mut state, fixture("clean.csv"), &options).expect("sweep");

    // Nothing to clean in a clean file.
    assert_eq!(outcome.rows_before, 10);
    assert_eq!(outcome.rows_after, 10);
    assert_eq!(outcome.columns_before, 5);
    assert!(outcome.cleaning.is_noop());
    assert_eq!(outcome.export.expect("payload").file_name, "clean.csv");
}

#[test]
fn test_sweep_removes_duplicates_from_fixture() {
    let mut state = SessionState::new();
    let options = SweepOptions {
        remove_duplicates: true,
        format: Some(ExportFormat::Csv),
        ..Default::default()
    };

    let outcome =
        orchestrator::sweep_file(&mut state, fixture("duplicates.csv"), &options).expect("sweep");

    assert_eq!(outcome.rows_before, 6);
    assert_eq!(outcome.rows_after, 3);
    assert_eq!(outcome.cleaning.duplicates_removed, 3);

    // First occurrences survive in original order.
    let payload = outcome.export.expect("payload");
    let text = String::from_utf8(payload.bytes).expect("utf8 csv");
    assert_eq!(text, "a,b\n1,2\n3,4\n5,6\n");
}

#[test]
fn test_sweep_imputes_missing_values_in_fixture() {
    let mut state = SessionState::new();
    let options = SweepOptions {
        fill_missing: true,
        format: Some(ExportFormat::Csv),
        ..Default::default()
    };

    let outcome = orchestrator::sweep_file(&mut state, fixture("missing_values.csv"), &options)
        .expect("sweep");

    assert_eq!(
        outcome.cleaning.columns_imputed,
        vec!["age".to_owned(), "score".to_owned()]
    );

    // Reload the export and verify the filled values are the column means.
    let payload = outcome.export.expect("payload");
    let reloaded = load_table(&payload.bytes, FileFormat::Csv).expect("round trip");

    let age = reloaded.column("age").expect("age column");
    assert_eq!(age.null_count(), 0);
    let ages = age.as_materialized_series().f64().expect("f64").to_vec();
    // Mean of 34, 41, 37, 45.
    assert_eq!(ages[1], Some(39.25));
    assert_eq!(ages[4], Some(39.25));

    let score = reloaded.column("score").expect("score column");
    assert_eq!(score.null_count(), 0);
    let scores = score.as_materialized_series().f64().expect("f64").to_vec();
    // Mean of 80, 90, 70, 60.
    assert_eq!(scores[2], Some(75.0));
    assert_eq!(scores[4], Some(75.0));

    // Text columns are out of scope for imputation.
    assert!(reloaded.column("name").expect("name").dtype().is_string());
}

#[test]
fn test_excel_round_trip_through_pipeline() {
    let mut state = SessionState::new();
    let options = SweepOptions {
        format: Some(ExportFormat::Excel),
        ..Default::default()
    };

    let outcome =
        orchestrator::sweep_file(&mut state, fixture("clean.csv"), &options).expect("sweep");
    let payload = outcome.export.expect("payload");
    assert_eq!(payload.file_name, "clean.xlsx");
    assert_eq!(
        payload.mime_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );

    // Open the exported workbook as a fresh upload in a new session.
    let upload = UploadedFile::new("clean.xlsx", payload.bytes).expect("xlsx upload");
    let mut second = SessionState::new();
    let entry = second.open(upload).expect("parse exported workbook");

    assert_eq!(entry.table.height(), 10);
    assert_eq!(entry.table.width(), 5);
    let names = entry
        .table
        .column("name")
        .expect("name column")
        .as_materialized_series()
        .str()
        .expect("strings")
        .into_iter()
        .map(|v| v.map(str::to_owned))
        .collect::<Vec<_>>();
    assert_eq!(names[0].as_deref(), Some("Alice"));
    assert_eq!(names[9].as_deref(), Some("Judy"));

    let salary = entry
        .table
        .column("salary")
        .expect("salary column")
        .as_materialized_series()
        .f64()
        .expect("f64")
        .get(0);
    assert_eq!(salary, Some(55000.5));
}

#[test]
fn test_selection_then_export_keeps_table_order() {
    let mut state = SessionState::new();
    orchestrator::open_file(&mut state, fixture("clean.csv")).expect("open");

    let snap = orchestrator::dispatch(
        &mut state,
        "clean.csv",
        Action::SelectColumns(vec!["salary".to_owned(), "id".to_owned()]),
    )
    .expect("selection");
    assert_eq!(snap.columns, 2);

    let payload = orchestrator::dispatch(
        &mut state,
        "clean.csv",
        Action::Export(ExportFormat::Csv),
    )
    .expect("export")
    .export
    .expect("payload");

    let text = String::from_utf8(payload.bytes).expect("utf8 csv");
    // Table order is {id, salary}, not the requested {salary, id}.
    assert!(text.starts_with("id,salary\n1,55000.5\n"));
}

#[test]
fn test_unsupported_fixture_is_rejected_up_front() {
    let err = UploadedFile::from_path(&PathBuf::from("testdata/invalid_format.txt")).unwrap_err();
    assert!(matches!(err, SweeperError::UnsupportedFormat(_)));
}

#[test]
fn test_batch_files_are_independent() {
    let mut state = SessionState::new();
    let options = SweepOptions {
        remove_duplicates: true,
        format: Some(ExportFormat::Csv),
        ..Default::default()
    };

    // A failing file (unsupported) does not prevent later files from being
    // processed; the session holds each file separately.
    let paths = [
        "testdata/duplicates.csv",
        "testdata/invalid_format.txt",
        "testdata/clean.csv",
    ];
    let mut processed = 0usize;
    for path in paths {
        let file = match UploadedFile::from_path(&PathBuf::from(path)) {
            Ok(file) => file,
            Err(_) => continue,
        };
        orchestrator::sweep_file(&mut state, file, &options).expect("sweep");
        processed += 1;
    }

    assert_eq!(processed, 2);
    assert_eq!(state.len(), 2);
    assert!(state.get("duplicates.csv").is_some());
    assert!(state.get("clean.csv").is_some());
}

#[test]
fn test_empty_selection_blocks_export_but_keeps_session() {
    let mut state = SessionState::new();
    orchestrator::open_file(&mut state, fixture("clean.csv")).expect("open");

    orchestrator::dispatch(&mut state, "clean.csv", Action::SelectColumns(Vec::new()))
        .expect("empty selection is representable");

    let err = orchestrator::dispatch(
        &mut state,
        "clean.csv",
        Action::Export(ExportFormat::Csv),
    )
    .unwrap_err();
    assert!(matches!(err, SweeperError::Export(_)));

    // The session entry survives the rejected export.
    assert!(state.get("clean.csv").is_some());
}
