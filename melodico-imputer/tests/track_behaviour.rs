//! Behavioural coverage for the track imputer.

mod support;

use melodico_core::{Dataset, Recording, Release, Row, Value};
use melodico_imputer::test_support::ScriptedRecordingSource;
use melodico_imputer::{AuditLog, ImputeError, TrackImputer, TrackImputerConfig};
use rstest::{fixture, rstest};
use support::{audit_lines, audit_path};
use tempfile::TempDir;

fn columns() -> Vec<String> {
    [
        "id",
        "title",
        "primary_artist",
        "album",
        "date",
        "duration",
        "language",
    ]
    .map(str::to_owned)
    .to_vec()
}

fn sparse_row() -> Row {
    Row::from_pairs([
        ("id", Value::from("TRK001")),
        ("title", Value::from("  Song   X ")),
        ("primary_artist", Value::from("Artist Z")),
        ("album", Value::Null),
        ("date", Value::from("")),
        ("duration", Value::Null),
        ("language", Value::Null),
    ])
}

fn full_row() -> Row {
    Row::from_pairs([
        ("id", Value::from("TRK002")),
        ("title", Value::from("Song X")),
        ("primary_artist", Value::from("Artist Z")),
        ("album", Value::from("Album Y")),
        ("date", Value::from("2016-09-09")),
        ("duration", Value::Number(215_000.0)),
        ("language", Value::from("it")),
    ])
}

#[fixture]
fn catalogue() -> ScriptedRecordingSource {
    ScriptedRecordingSource::new().with_recording(
        "Song X",
        Recording {
            title: "Song X".to_owned(),
            length_ms: Some(215_000),
            first_release_date: Some("2016-9-9".to_owned()),
            releases: vec![Release {
                title: Some("Album Y".to_owned()),
                date: Some("2016-9-9".to_owned()),
                language: Some("ita".to_owned()),
            }],
        },
    )
}

#[rstest]
fn fully_populated_rows_never_touch_the_network(catalogue: ScriptedRecordingSource) {
    let mut dataset = Dataset::new(columns(), vec![full_row()]);
    let before = dataset.clone();
    let temp = TempDir::new().expect("create temporary directory");
    let log_path = audit_path(&temp, "tracks.jsonl");
    let mut imputer = TrackImputer::new(catalogue, TrackImputerConfig::default())
        .with_audit_log(AuditLog::new(log_path.clone()));

    let summary = imputer.impute(&mut dataset).expect("batch should complete");

    assert_eq!(summary.rows, 1);
    assert_eq!(summary.rows_changed, 0);
    assert_eq!(dataset, before);
    assert_eq!(imputer.source().calls(), 0);
    assert!(!log_path.as_std_path().exists());
}

#[rstest]
fn missing_columns_are_filled_from_the_first_match(catalogue: ScriptedRecordingSource) {
    let mut dataset = Dataset::new(columns(), vec![sparse_row()]);
    let temp = TempDir::new().expect("create temporary directory");
    let log_path = audit_path(&temp, "tracks.jsonl");
    let mut imputer = TrackImputer::new(catalogue, TrackImputerConfig::default())
        .with_audit_log(AuditLog::new(log_path.clone()));

    let summary = imputer.impute(&mut dataset).expect("batch should complete");

    assert_eq!(summary.rows_changed, 1);
    assert_eq!(imputer.source().calls(), 1);
    let row = dataset.rows().first().expect("row should remain");
    assert_eq!(row.get("album"), Some(&Value::from("Album Y")));
    assert_eq!(row.get("date"), Some(&Value::from("2016-09-09")));
    assert_eq!(row.get("duration"), Some(&Value::Number(215_000.0)));
    assert_eq!(row.get("language"), Some(&Value::from("it")));

    let lines = audit_lines(&log_path);
    assert_eq!(lines.len(), 1);
    let entry = lines.first().expect("one audit entry");
    assert_eq!(entry["track_id"], "TRK001");
    assert_eq!(entry["title"], "Song X");
    assert_eq!(entry["updates"]["album"], "Album Y");
}

#[rstest]
fn empty_titles_are_skipped_silently(catalogue: ScriptedRecordingSource) {
    let mut row = sparse_row();
    row.insert("title", Value::from("   "));
    let mut dataset = Dataset::new(columns(), vec![row]);
    let before = dataset.clone();
    let mut imputer = TrackImputer::new(catalogue, TrackImputerConfig::default());

    let summary = imputer.impute(&mut dataset).expect("batch should complete");

    assert_eq!(summary.rows_changed, 0);
    assert_eq!(dataset, before);
    assert_eq!(imputer.source().calls(), 0);
}

#[rstest]
fn absent_recordings_leave_the_row_unmodified() {
    let mut dataset = Dataset::new(columns(), vec![sparse_row()]);
    let before = dataset.clone();
    let mut imputer =
        TrackImputer::new(ScriptedRecordingSource::new(), TrackImputerConfig::default());

    let summary = imputer.impute(&mut dataset).expect("batch should complete");

    assert_eq!(summary.rows_changed, 0);
    assert_eq!(dataset, before);
    assert_eq!(imputer.source().calls(), 1);
}

#[rstest]
fn registered_column_missing_from_the_dataset_aborts(catalogue: ScriptedRecordingSource) {
    let row = Row::from_pairs([
        ("id", Value::from("TRK003")),
        ("title", Value::from("Song X")),
        ("primary_artist", Value::from("Artist Z")),
        ("album", Value::Null),
    ]);
    let narrow_columns = ["id", "title", "primary_artist", "album"]
        .map(str::to_owned)
        .to_vec();
    let mut dataset = Dataset::new(narrow_columns, vec![row]);
    let mut imputer = TrackImputer::new(catalogue, TrackImputerConfig::default());

    let outcome = imputer.impute(&mut dataset);
    assert!(matches!(
        outcome,
        Err(ImputeError::MissingColumn { column, .. }) if column == "date"
    ));
}

#[rstest]
fn a_second_run_is_idempotent_and_quiet(catalogue: ScriptedRecordingSource) {
    let mut dataset = Dataset::new(columns(), vec![sparse_row()]);
    let mut imputer = TrackImputer::new(catalogue, TrackImputerConfig::default());

    imputer.impute(&mut dataset).expect("first run completes");
    let after_first = dataset.clone();
    let calls_after_first = imputer.source().calls();

    let summary = imputer.impute(&mut dataset).expect("second run completes");

    assert_eq!(summary.rows_changed, 0);
    assert_eq!(dataset, after_first);
    assert_eq!(imputer.source().calls(), calls_after_first);
}

#[rstest]
fn artist_falls_back_to_the_secondary_column(catalogue: ScriptedRecordingSource) {
    let mut row = sparse_row();
    row.insert("primary_artist", Value::Null);
    row.insert("name_artist", Value::from("Fallback Artist"));
    let mut dataset = Dataset::new(columns(), vec![row]);
    let mut imputer = TrackImputer::new(catalogue, TrackImputerConfig::default());

    let summary = imputer.impute(&mut dataset).expect("batch should complete");
    assert_eq!(summary.rows_changed, 1);
}
