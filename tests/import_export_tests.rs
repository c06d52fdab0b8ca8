use chrono::NaiveDate;
use std::io::Write;
use tempfile::NamedTempFile;
use triage_tool::{
    BoardMetadata, TaskBoard, load_board_from_csv, load_board_from_json, save_board_to_csv,
    save_board_to_json,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn sample_board() -> TaskBoard {
    let mut metadata = BoardMetadata::default();
    metadata.board_name = "Sample".to_string();
    metadata.board_description = "Round trip fixture".to_string();
    let mut board = TaskBoard::new_with_metadata(metadata);
    let base = board
        .add_task("Gather requirements", d(2025, 6, 9), 3.0, 7, Vec::new())
        .unwrap();
    board
        .add_task("Write proposal", d(2025, 6, 12), 6.0, 8, vec![base.id])
        .unwrap();
    board.complete_task(base.id).unwrap();
    board
}

#[test]
fn json_round_trip_preserves_tasks_and_metadata() {
    let board = sample_board();
    let tmp = NamedTempFile::new().expect("create temp file");
    save_board_to_json(&board, tmp.path()).unwrap();

    let loaded = load_board_from_json(tmp.path()).unwrap();
    assert_eq!(loaded.board_name(), "Sample");
    assert_eq!(loaded.board_description(), "Round trip fixture");
    assert_eq!(loaded.tasks().unwrap(), board.tasks().unwrap());
}

#[test]
fn csv_round_trip_preserves_tasks_and_metadata() {
    let board = sample_board();
    let tmp = NamedTempFile::new().expect("create temp file");
    save_board_to_csv(&board, tmp.path()).unwrap();

    let loaded = load_board_from_csv(tmp.path()).unwrap();
    assert_eq!(loaded.board_name(), "Sample");
    assert_eq!(loaded.tasks().unwrap(), board.tasks().unwrap());
}

#[test]
fn cyclic_snapshot_is_rejected_on_load() {
    let json = r#"{
        "metadata": { "board_name": "Bad", "board_description": "" },
        "tasks": [
            { "id": 1, "title": "A", "due_date": "2025-06-09", "estimated_hours": 1.0, "importance": 5, "dependencies": [2] },
            { "id": 2, "title": "B", "due_date": "2025-06-09", "estimated_hours": 1.0, "importance": 5, "dependencies": [1] }
        ]
    }"#;
    let mut tmp = NamedTempFile::new().expect("create temp file");
    tmp.write_all(json.as_bytes()).unwrap();

    let err = load_board_from_json(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("cycle"));
}

#[test]
fn snapshot_with_unknown_dependency_is_rejected() {
    let json = r#"{
        "metadata": { "board_name": "Bad", "board_description": "" },
        "tasks": [
            { "id": 1, "title": "A", "due_date": "2025-06-09", "estimated_hours": 1.0, "importance": 5, "dependencies": [99] }
        ]
    }"#;
    let mut tmp = NamedTempFile::new().expect("create temp file");
    tmp.write_all(json.as_bytes()).unwrap();

    let err = load_board_from_json(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("unknown dependency"));
}

#[test]
fn csv_without_tasks_is_invalid() {
    let board = TaskBoard::new();
    let tmp = NamedTempFile::new().expect("create temp file");
    save_board_to_csv(&board, tmp.path()).unwrap();

    let err = load_board_from_csv(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("no tasks"));
}
