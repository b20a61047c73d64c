//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a temporary data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_moimoi-cli"))
        .env("MOIMOI_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn first_id(data_dir: &Path, kind: &str) -> String {
    let (code, stdout, _) = run_cli(data_dir, &[kind, "list", "--json"]);
    assert_eq!(code, 0, "{kind} list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    parsed[0]["id"].as_str().unwrap().to_string()
}

#[test]
fn test_task_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["task", "add", "Write tests"]);
    assert_eq!(code, 0, "Task add failed");
    assert!(stdout.contains("Task created:"));

    let (code, stdout, _) = run_cli(dir.path(), &["task", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Write tests"));
}

#[test]
fn test_toggle_twice_same_day_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["task", "add", "Once a day"]);
    let id = first_id(dir.path(), "task");

    let (code, stdout, _) = run_cli(dir.path(), &["--date", "2026-02-03", "task", "toggle", &id]);
    assert_eq!(code, 0, "first toggle failed");
    let outcome: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(outcome["outcome"], "completed");

    let (code, stdout, stderr) = run_cli(dir.path(), &["--date", "2026-02-03", "task", "toggle", &id]);
    assert_eq!(code, 2);
    let outcome: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(outcome["outcome"], "rejected");
    assert!(stderr.contains("Already completed today"));

    let (code, stdout, _) = run_cli(dir.path(), &["--date", "2026-02-03", "progress", "show", "--json"]);
    assert_eq!(code, 0);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["fire_points_total"], 1);
    assert_eq!(snapshot["fires_earned_today"], 1);
    assert_eq!(snapshot["streak_days"], 1);
}

#[test]
fn test_spend_more_than_balance_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["progress", "spend", "3"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Not enough fire points"));
}

#[test]
fn test_onboard_once() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["onboard", "water", "read"]);
    assert_eq!(code, 0, "onboard failed");
    assert!(stdout.contains("2 habit(s) added"));

    let (code, _, stderr) = run_cli(dir.path(), &["onboard", "walk"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));

    let (code, stdout, _) = run_cli(dir.path(), &["habit", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Read 10 pages"));
}

#[test]
fn test_unknown_template_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["onboard", "skydive"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown template"));
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "rewards.task_daily_fire_limit"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "5");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "rewards.task_daily_fire_limit", "2"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "rewards.task_daily_fire_limit"]);
    assert_eq!(stdout.trim(), "2");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "happiness.initial", "150"]);
    assert_eq!(code, 1);

    let (code, _, stderr) = run_cli(dir.path(), &["config", "get", "rewards.bogus"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key: rewards.bogus"));

    let (code, stdout, _) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[rewards]"));
    assert!(stdout.contains("task_daily_fire_limit = 2"));
}

#[test]
fn test_onboard_after_activity_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["task", "add", "Before onboarding"]);
    let (code, _, stderr) = run_cli(dir.path(), &["onboard", "water"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("before any items or progress"));
}

#[test]
fn test_decay_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["progress", "decay", "--ticks", "3"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "happiness: 97");

    let (code, _, _) = run_cli(dir.path(), &["clear"]);
    assert_eq!(code, 1);
    let (code, _, _) = run_cli(dir.path(), &["clear", "--yes"]);
    assert_eq!(code, 0);

    let (_, stdout, _) = run_cli(dir.path(), &["progress", "show", "--json"]);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["happiness"], 100);
}

#[test]
fn test_calendar_json_covers_range() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["calendar", "--from", "2026-02-01", "--to", "2026-02-07", "--json"],
    );
    assert_eq!(code, 0);
    let days: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(days.as_array().unwrap().len(), 7);
}
