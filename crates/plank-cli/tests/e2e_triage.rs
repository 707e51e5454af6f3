//! E2E CLI tests for `pk triage`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

/// A blocks B and C, B blocks D.
const BOARD: &str = r#"[
  {"id": "A", "title": "Schema", "priority": "urgent", "blocking": ["B", "C"]},
  {"id": "B", "title": "Migration", "blocking": ["D"]},
  {"id": "C", "title": "API"},
  {"id": "D", "title": "Backfill"}
]"#;

fn pk_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pk").expect("pk binary must exist");
    cmd.current_dir(dir);
    cmd.env("PLANK_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd
}

fn board_dir(board: &str) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("items.json"), board).expect("write items");
    dir
}

fn triage_json(dir: &Path, extra: &[&str]) -> Value {
    let output = pk_cmd(dir)
        .arg("triage")
        .args(extra)
        .arg("--json")
        .output()
        .expect("pk should not crash");
    assert!(
        output.status.success(),
        "triage failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json should produce valid JSON")
}

#[test]
fn triage_json_summary() {
    let dir = board_dir(BOARD);
    let json = triage_json(dir.path(), &[]);

    assert_eq!(json["total"], 4);
    assert_eq!(json["readyCount"], 1);
    assert_eq!(json["blockedCount"], 3);
    assert_eq!(json["criticalPathCount"], 1);
    assert!(json["cycles"].as_array().expect("cycles").is_empty());

    let ranked = json["ranked"].as_array().expect("ranked");
    assert_eq!(ranked.len(), 4);
    let a = ranked
        .iter()
        .find(|row| row["id"] == "A")
        .expect("A is ranked");
    assert_eq!(a["unblockCount"], 3);
    assert_eq!(a["criticalPath"], true);
    assert_eq!(a["ready"], true);
}

#[test]
fn triage_limit_truncates_ranking() {
    let dir = board_dir(BOARD);
    let json = triage_json(dir.path(), &["--limit", "2"]);
    assert_eq!(json["ranked"].as_array().expect("ranked").len(), 2);
    assert_eq!(json["total"], 4);
}

#[test]
fn triage_pretty_shows_badge() {
    let dir = board_dir(BOARD);
    pk_cmd(dir.path())
        .args(["triage", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ranked by impact"))
        .stdout(predicate::str::contains("Unblocks 3 items"));
}

#[test]
fn triage_reports_cycles() {
    let dir = board_dir(
        r#"[
          {"id": "a", "blocking": ["b"]},
          {"id": "b", "blocking": ["a"]}
        ]"#,
    );
    pk_cmd(dir.path())
        .args(["triage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cycle  a -> b"));
}

#[test]
fn triage_empty_board() {
    let dir = board_dir("[]");
    let json = triage_json(dir.path(), &[]);
    assert_eq!(json["total"], 0);
    assert!(json["ranked"].as_array().expect("ranked").is_empty());
}

#[test]
fn triage_rejects_bad_config() {
    let dir = board_dir(BOARD);
    std::fs::create_dir_all(dir.path().join(".plank")).expect("mkdir");
    std::fs::write(dir.path().join(".plank/config.toml"), "[triage]\ndamping = 2.0\n")
        .expect("write config");
    pk_cmd(dir.path())
        .args(["triage"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("triage.damping"));
}
