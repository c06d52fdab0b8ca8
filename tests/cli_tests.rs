#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

#[test]
fn cli_add_and_delete_commands() {
    run_cli("add TaskA 2025-12-01 5 5\ndelete 1\nquit\n")
        .success()
        .stdout(str_contains("Task 1 created."))
        .stdout(str_contains("Deleted task 1."));
}

#[test]
fn cli_rejects_circular_dependency() {
    run_cli("add TaskA 2030-01-01 3 5\nadd TaskB 2030-01-02 3 5 1\ndepend 1 2\nquit\n")
        .success()
        .stdout(str_contains("circular dependency detected"));
}

#[test]
fn cli_reports_validation_errors() {
    run_cli("add TaskA 2030-01-01 3 11\nquit\n")
        .success()
        .stdout(str_contains("importance"));
}

#[test]
fn cli_analyze_reports_blocked_tasks() {
    run_cli(
        "add Base 2030-01-01 3 5\nadd Dependent 2030-01-02 1 5 1\nanalyze 2025-06-09\ncomplete 1\nanalyze 2025-06-09\nquit\n",
    )
    .success()
    .stdout(str_contains("Blocked by incomplete task: Base"))
    .stdout(str_contains("Task 1 completed."));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "add TaskPersist 2025-12-01 4 5\nsave json {}\nadd Temp 2025-12-02 1 5\nload json {}\nshow\nquit\n",
        path, path
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(
        output.contains("Board loaded from"),
        "expected output to mention load completion"
    );
    assert!(
        output.contains("TaskPersist"),
        "expected persisted task to remain"
    );
    let after_reload = output.split("Board loaded from").last().unwrap_or_default();
    assert!(
        !after_reload.contains("Temp"),
        "temporary task should not appear after reload:\n{}",
        after_reload
    );
}
