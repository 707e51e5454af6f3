//! E2E CLI tests for `pk filter`, `pk validate` and `pk presets`.
//!
//! Each test runs the `pk` binary in an isolated temp directory holding an
//! `items.json` board snapshot.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

const BOARD: &str = r#"[
  {"id": "1", "title": "Login timeout", "status": "open", "priority": "urgent", "labels": ["backend"]},
  {"id": "2", "title": "Docs pass", "status": "open", "priority": "low"},
  {"id": "3", "title": "Release", "status": "done", "priority": "high"},
  {"id": "4", "title": "Theme", "status": "in_progress", "priority": "medium"},
  {"id": "5", "title": "Rate limits", "status": "open", "priority": 2, "labels": ["backend"]}
]"#;

/// Build a Command targeting the `pk` binary, rooted in `dir`.
fn pk_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pk").expect("pk binary must exist");
    cmd.current_dir(dir);
    // Suppress tracing output that goes to stderr.
    cmd.env("PLANK_LOG", "error");
    cmd.env_remove("FORMAT");
    // Keep the developer's own config out of the run.
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd
}

fn board_dir() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("items.json"), BOARD).expect("write items");
    dir
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = pk_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("pk should not crash");
    assert!(
        output.status.success(),
        "pk {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json should produce valid JSON")
}

fn matched_ids(json: &Value) -> Vec<String> {
    json["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|item| item["id"].as_str().expect("id").to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// filter
// ---------------------------------------------------------------------------

#[test]
fn filter_status_and_priority_range() {
    let dir = board_dir();
    let json = run_json(dir.path(), &["filter", "status:open AND priority:1-2"]);
    assert_eq!(matched_ids(&json), ["1", "5"]);
    assert_eq!(json["total"], 5);
    assert_eq!(json["matched"], 2);
}

#[test]
fn filter_text_output_lists_rows() {
    let dir = board_dir();
    pk_cmd(dir.path())
        .args(["filter", "labels:backend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1  open  urgent  Login timeout"))
        .stdout(predicate::str::contains("5  open  high  Rate limits"))
        .stdout(predicate::str::contains("Docs pass").not());
}

#[test]
fn filter_without_query_returns_everything() {
    let dir = board_dir();
    let json = run_json(dir.path(), &["filter"]);
    assert_eq!(json["matched"], 5);
}

#[test]
fn filter_uses_configured_default_query() {
    let dir = board_dir();
    std::fs::create_dir_all(dir.path().join(".plank")).expect("mkdir");
    std::fs::write(
        dir.path().join(".plank/config.toml"),
        "[query]\ndefault = \"status:done\"\n",
    )
    .expect("write config");
    let json = run_json(dir.path(), &["filter"]);
    assert_eq!(matched_ids(&json), ["3"]);
}

#[test]
fn filter_preset() {
    let dir = board_dir();
    let json = run_json(dir.path(), &["filter", "--preset", "high-priority"]);
    assert_eq!(matched_ids(&json), ["1", "3", "5"]);
}

#[test]
fn filter_unknown_preset_fails_with_code() {
    let dir = board_dir();
    let output = pk_cmd(dir.path())
        .args(["filter", "--preset", "nope", "--json"])
        .output()
        .expect("pk should not crash");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"error_code\": \"unknown_preset\""), "{stderr}");
}

#[test]
fn filter_invalid_query_fails() {
    let dir = board_dir();
    pk_cmd(dir.path())
        .args(["filter", "(status:open"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("position"));
}

#[test]
fn filter_reads_items_flag() {
    let dir = board_dir();
    std::fs::write(dir.path().join("other.json"), r#"[{"id": "x", "title": "Only"}]"#)
        .expect("write other");
    let json = run_json(dir.path(), &["filter", "--items", "other.json"]);
    assert_eq!(matched_ids(&json), ["x"]);
}

#[test]
fn missing_items_file_fails_with_code() {
    let dir = TempDir::new().expect("tempdir");
    pk_cmd(dir.path())
        .args(["filter", "status:open"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"))
        .stderr(predicate::str::contains("--items"));
}

#[test]
fn malformed_items_file_fails_with_code() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("items.json"), "{not json").expect("write");
    let output = pk_cmd(dir.path())
        .args(["filter", "--json"])
        .output()
        .expect("pk should not crash");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("items_file_invalid"), "{stderr}");
}

// ---------------------------------------------------------------------------
// validate / presets
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_good_query() {
    let dir = board_dir();
    let json = run_json(dir.path(), &["validate", "NOT status:done AND priority:1-2"]);
    assert_eq!(json["valid"], true);
}

#[test]
fn validate_reports_unbalanced_paren() {
    let dir = board_dir();
    pk_cmd(dir.path())
        .args(["validate", "(priority:1 OR priority:2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("position"));
}

#[test]
fn presets_lists_every_preset() {
    let dir = board_dir();
    let json = run_json(dir.path(), &["presets"]);
    let presets = json.as_array().expect("array");
    assert_eq!(presets.len(), 10);
    assert!(presets.iter().any(|p| p["id"] == "blocked"));
}

#[test]
fn format_flag_overrides_json() {
    let dir = board_dir();
    pk_cmd(dir.path())
        .args(["presets", "--json", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("high-priority\tpriority:1-2"));
}
