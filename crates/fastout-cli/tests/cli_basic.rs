//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against an isolated data directory and
//! verify its JSON output.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_fastout"))
        .env("FASTOUT_DATA_DIR", data_dir)
        .env_remove("FASTOUT_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_points_accumulate_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["points", "add", "20"]);
    let event = run_json(dir.path(), &["points", "add", "30"]);

    assert_eq!(event["type"], "PointsAwarded");
    assert_eq!(event["total"], 50);
    assert_eq!(event["streak"], 1);
}

#[test]
fn test_workout_log_applies_bonus() {
    let dir = tempfile::tempdir().unwrap();
    let events = run_json(dir.path(), &["workout", "log", "cardio", "50"]);
    assert_eq!(events[0]["type"], "WorkoutLogged");
    assert_eq!(events[0]["workout"]["points"], 30);
    assert_eq!(events[1]["total"], 30);

    let history = run_json(dir.path(), &["workout", "list"]);
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[test]
fn test_premium_workout_is_gated() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["workout", "log", "hiit", "30"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("premium"), "stderr: {stderr}");
}

#[test]
fn test_unknown_workout_type_is_invalid_argument() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["workout", "log", "pilates", "30"]);
    assert_eq!(code, 3);
}

#[test]
fn test_game_unlock_opens_premium_fast() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_json(dir.path(), &["game", "report", "240"]);
    assert_eq!(report["outcome"]["outcome"], "unlocked");

    let status = run_json(dir.path(), &["premium", "status"]);
    assert_eq!(status["premium"], true);
    assert_eq!(status["status"]["source"], "temporary");

    let started = run_json(dir.path(), &["fast", "start", "omad"]);
    assert_eq!(started["type"], "FastStarted");
    assert!(started["session"]["started_at"].is_string());
}

#[test]
fn test_fast_cannot_complete_early() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["fast", "start", "16:8"]);

    let status = run_json(dir.path(), &["fast", "status"]);
    assert_eq!(status["finished"], false);
    let remaining = status["remaining_minutes"].as_i64().unwrap();
    assert!(remaining > 15 * 60 && remaining <= 16 * 60, "remaining: {remaining}");

    let (_, stderr, code) = run_cli(dir.path(), &["fast", "complete"]);
    assert_eq!(code, 3);
    assert!(stderr.contains("min left"), "stderr: {stderr}");

    let profile = run_json(dir.path(), &["profile", "show"]);
    assert_eq!(profile["points"], 0);
    assert_eq!(profile["active_fast"]["protocol"], "16:8");
}

#[test]
fn test_fast_complete_without_active_fast_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["fast", "complete"]);
    assert_eq!(code, 3);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "rules.streak_threshold"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "30");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "rules.streak_threshold", "10"]);
    assert_eq!(code, 0);

    let event = run_json(dir.path(), &["points", "add", "10"]);
    assert_eq!(event["streak"], 1);

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "rules.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_rejects_zero_history_limit() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) =
        run_cli(dir.path(), &["config", "set", "rules.workout_history_limit", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("workout_history_limit"), "stderr: {stderr}");

    run_json(dir.path(), &["workout", "log", "cardio", "20"]);
    let history = run_json(dir.path(), &["workout", "list"]);
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[test]
fn test_reset_discards_progress() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["points", "add", "45"]);
    let (_, _, code) = run_cli(dir.path(), &["reset"]);
    assert_eq!(code, 0);

    let profile = run_json(dir.path(), &["profile", "show"]);
    assert_eq!(profile["points"], 0);
    assert_eq!(profile["profile"]["name"], "Guest");
}

#[test]
fn test_auth_status_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let status = run_json(dir.path(), &["auth", "status"]);
    assert_eq!(status["signed_in"], false);
}
