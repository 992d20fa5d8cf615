//! End-to-end tests for the `lockin` binary.
//!
//! Stdout is never a terminal here, so every command answers in JSON.

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;

fn lockin(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lockin").unwrap();
    cmd.env_remove("LOCKIN_TEST_DB")
        .env_remove("LOCKIN_MAX_ATTEMPTS")
        .env_remove("RUST_LOG")
        .arg("--db")
        .arg(db);
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

fn stderr_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stderr).unwrap()
}

#[test]
fn test_save_then_list() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("timers.db");

    let output = lockin(&db).args(["save", "Deep Focus", "1500"]).output().unwrap();
    assert!(output.status.success());
    let saved = stdout_json(&output);
    assert_eq!(saved["path"], "primary");
    assert_eq!(saved["elapsed"], "25:00");

    let output = lockin(&db).arg("list").output().unwrap();
    assert!(output.status.success());
    let listed = stdout_json(&output);
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["timers"][0]["title"], "Deep Focus");
    assert_eq!(listed["timers"][0]["duration"], 1500);
    assert_eq!(listed["timers"][0]["id"], saved["id"]);
}

#[test]
fn test_fractional_duration_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("timers.db");

    lockin(&db).args(["save", "Focus", "90.9"]).assert().success();

    let output = lockin(&db).arg("list").output().unwrap();
    assert_eq!(stdout_json(&output)["timers"][0]["duration"], 90);
}

#[test]
fn test_blank_title_uses_default() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("timers.db");

    lockin(&db).args(["save", "   ", "60"]).assert().success();

    let output = lockin(&db).arg("list").output().unwrap();
    assert_eq!(stdout_json(&output)["timers"][0]["title"], "Deep Work Session");
}

#[test]
fn test_invalid_durations_exit_with_validation_code() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("timers.db");

    for duration in ["abc", "0", "-5", "0.5"] {
        let output = lockin(&db).args(["save", "Focus", duration]).output().unwrap();
        assert_eq!(output.status.code(), Some(4), "duration {duration}");
        assert_eq!(stderr_json(&output)["error"]["code"], "INVALID_INPUT");
    }

    let output = lockin(&db).arg("list").output().unwrap();
    assert_eq!(stdout_json(&output)["count"], 0);
}

#[test]
fn test_unreachable_database_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let db = blocker.join("timers.db");

    let output = lockin(&db).args(["save", "Focus", "300"]).output().unwrap();
    assert!(output.status.success());

    let saved = stdout_json(&output);
    assert_eq!(saved["path"], "fallback");
    assert_eq!(saved["cause"], "CONNECTION_OPEN_FAILURE");
    assert_eq!(
        saved["message"],
        "Timer completed successfully! Data temporarily stored in memory."
    );
}

#[test]
fn test_silent_save_prints_only_id() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("timers.db");

    let output = lockin(&db)
        .args(["--silent", "save", "Focus", "60"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id: i64 = String::from_utf8(output.stdout).unwrap().trim().parse().unwrap();
    assert!(id > 0);
}

#[test]
fn test_list_csv() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("timers.db");

    lockin(&db).args(["save", "Read, then write", "60"]).assert().success();

    let output = lockin(&db).args(["list", "--format", "csv"]).output().unwrap();
    let text = String::from_utf8(output.stdout).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("id,title,duration,completed_at"));
    assert!(lines.next().unwrap().contains("\"Read, then write\",60,"));
}

#[test]
fn test_activity_counts_today() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("timers.db");

    lockin(&db).args(["save", "a", "60"]).assert().success();
    lockin(&db).args(["save", "b", "120"]).assert().success();

    let output = lockin(&db).arg("activity").output().unwrap();
    assert!(output.status.success());
    let activity = stdout_json(&output);
    assert_eq!(activity["total_timers"], 2);
    assert_eq!(activity["active_days"], 1);
    assert_eq!(activity["total_seconds"], 180);

    let days = activity["days"].as_array().unwrap();
    assert_eq!(days.last().unwrap()["count"], 2);
}

#[test]
fn test_activity_rejects_malformed_day() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("timers.db");

    let output = lockin(&db)
        .args(["activity", "--day", "31/01/2025"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_status_reports_healthy_connection() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("timers.db");

    let output = lockin(&db).arg("status").output().unwrap();
    assert!(output.status.success());
    let status = stdout_json(&output);
    assert_eq!(status["state"], "healthy");
    assert_eq!(status["timer_count"], 0);
    assert_eq!(status["max_attempts"], 3);
}

#[test]
fn test_directory_as_database_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    let output = lockin(dir.path()).arg("list").output().unwrap();
    assert!(!output.status.success());
    assert!(stderr_json(&output)["error"]["code"].is_string());
}

#[test]
fn test_version_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = lockin(&dir.path().join("timers.db"))
        .arg("version")
        .output()
        .unwrap();

    let version = stdout_json(&output);
    assert_eq!(version["name"], "lockin");
    assert_eq!(version["version"], env!("CARGO_PKG_VERSION"));
}

/// Binary with a throwaway home directory and no `--db` flag.
fn lockin_in_home(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lockin").unwrap();
    cmd.env("HOME", home)
        .env_remove("LOCKIN_DB")
        .env_remove("LOCKIN_TEST_DB")
        .env_remove("LOCKIN_MAX_ATTEMPTS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_lockin_db_env_is_used_without_flag() {
    let home = tempfile::tempdir().unwrap();
    let db = home.path().join("custom.db");

    let output = lockin_in_home(home.path())
        .env("LOCKIN_DB", &db)
        .arg("status")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["location"], db.display().to_string());
}

#[test]
fn test_test_mode_wins_over_lockin_db_env() {
    let home = tempfile::tempdir().unwrap();
    let db = home.path().join("custom.db");

    let output = lockin_in_home(home.path())
        .env("LOCKIN_DB", &db)
        .env("LOCKIN_TEST_DB", "1")
        .arg("status")
        .output()
        .unwrap();
    assert!(output.status.success());

    let expected = home.path().join(".lockin").join("test").join("timers.db");
    assert_eq!(stdout_json(&output)["location"], expected.display().to_string());
    assert!(!db.exists());
}

#[test]
fn test_explicit_flag_wins_over_test_mode() {
    let home = tempfile::tempdir().unwrap();
    let db = home.path().join("flag.db");

    let output = lockin_in_home(home.path())
        .env("LOCKIN_TEST_DB", "1")
        .arg("--db")
        .arg(&db)
        .arg("status")
        .output()
        .unwrap();
    assert_eq!(stdout_json(&output)["location"], db.display().to_string());
}
