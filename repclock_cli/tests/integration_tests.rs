//! Integration tests for the repclock binary.
//!
//! These tests drive scripted sessions through stdin and verify:
//! - Rendered transitions on stdout
//! - Journal contents after a session
//! - Rejected intents and abandoned units

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ROUTINE: &str = r#"
name = "Push day"

[[exercise]]
id = "bench"
name = "Bench Press"
series = 2
rest_seconds = 90

[[exercise]]
id = "circuit"
name = "Circuit"
kind = "round"
rounds = 1
sub_exercise = [{ name = "Push-up", reps = 15 }, { name = "Dip" }]
"#;

const FULL_SESSION: &str = "\
weight 80
start
tick 40
done
rest
weight 82.5
tick 38
done
next
weight 20
tick 90
done
finish
";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("config.toml"), "").expect("write config");
        fs::write(dir.path().join("push.toml"), ROUTINE).expect("write routine");
        Self { dir }
    }

    fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    fn routine(&self) -> PathBuf {
        self.dir.path().join("push.toml")
    }

    fn journal(&self) -> PathBuf {
        self.data_dir().join("journal.jsonl")
    }

    fn cli(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repclock"));
        cmd.arg("--config")
            .arg(self.dir.path().join("config.toml"))
            .arg("--data-dir")
            .arg(self.data_dir());
        cmd
    }

    fn run(&self, script: &str) -> assert_cmd::assert::Assert {
        self.cli()
            .arg("run")
            .arg("--routine")
            .arg(self.routine())
            .write_stdin(script)
            .assert()
    }
}

fn read_journal_lines(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .expect("read journal")
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("journal line is JSON"))
        .collect()
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("repclock"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Workout session timer and progression tracker",
        ));
}

#[test]
fn test_show_classifies_routine() {
    let ws = Workspace::new();
    ws.cli()
        .arg("show")
        .arg("--routine")
        .arg(ws.routine())
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press: 2 x series"))
        .stdout(predicate::str::contains("Circuit: 1 x round"))
        .stdout(predicate::str::contains("- Push-up x15"));
}

#[test]
fn test_full_session_renders_progress() {
    let ws = Workspace::new();
    ws.run(FULL_SESSION)
        .success()
        .stdout(predicate::str::contains("Series 1 done in 40s @ 80"))
        .stdout(predicate::str::contains("Resting (90s suggested)"))
        .stdout(predicate::str::contains("bench finished: 2 unit(s), 78s"))
        .stdout(predicate::str::contains("Next up: Circuit"))
        .stdout(predicate::str::contains("Day complete"))
        .stdout(predicate::str::contains("Session finished: 168s total"));
}

#[test]
fn test_full_session_writes_journal() {
    let ws = Workspace::new();
    ws.run(FULL_SESSION).success();

    let entries = read_journal_lines(&ws.journal());
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0]["type"], "exercise_report");
    let bench = &entries[0]["report"];
    assert_eq!(bench["exercise_id"], "bench");
    assert_eq!(bench["unit_kind"], "series");
    assert_eq!(bench["units"][0]["elapsed_seconds"], 40);
    assert_eq!(bench["units"][0]["weight"], "80");
    assert_eq!(bench["units"][1]["weight"], "82.5");

    let circuit = &entries[1]["report"];
    assert_eq!(circuit["unit_kind"], "round");
    assert!(circuit["units"][0].get("weight").is_none());

    assert_eq!(entries[2]["type"], "session_finished");
    assert_eq!(entries[2]["total_seconds"], 168);

    let session_ids: Vec<&Value> = entries.iter().map(|e| &e["session_id"]).collect();
    assert!(session_ids.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_rejected_intent_is_reported() {
    let ws = Workspace::new();
    ws.run("resume\nstart\nrest\n")
        .success()
        .stdout(predicate::str::contains(
            "Invalid transition: cannot resume while Idle",
        ))
        .stdout(predicate::str::contains(
            "Invalid transition: cannot continue after rest while Running",
        ));
}

#[test]
fn test_close_mid_unit_writes_nothing() {
    let ws = Workspace::new();
    ws.run("start\ntick 10\nclose\n")
        .success()
        .stdout(predicate::str::contains("Closed; unsaved unit discarded"));

    assert!(!ws.journal().exists());
}

#[test]
fn test_unfinished_session_warns() {
    let ws = Workspace::new();
    ws.run("start\ntick 5\n")
        .success()
        .stdout(predicate::str::contains("Session left unfinished"));
}

#[test]
fn test_finish_mid_exercise_saves_partial_report() {
    let ws = Workspace::new();
    ws.run("start\ntick 40\ndone\nrest\ntick 12\nfinish\n")
        .success()
        .stdout(predicate::str::contains("Session finished: 52s total"));

    let entries = read_journal_lines(&ws.journal());
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["report"]["units"].as_array().unwrap().len(), 2);
}

#[test]
fn test_journal_write_failure_keeps_session_running() {
    let ws = Workspace::new();
    // A regular file where the data directory should be makes every append fail
    fs::write(ws.data_dir(), "not a directory").expect("write blocker");

    ws.run(FULL_SESSION)
        .success()
        .stdout(predicate::str::contains("Journal write failed"))
        .stdout(predicate::str::contains("Next up: Circuit"))
        .stdout(predicate::str::contains("Session finished: 168s total"))
        .stdout(predicate::str::contains("3 journal entries could not be saved"));
}

#[test]
fn test_no_journal_flag() {
    let ws = Workspace::new();
    ws.cli()
        .arg("run")
        .arg("--routine")
        .arg(ws.routine())
        .arg("--no-journal")
        .write_stdin(FULL_SESSION)
        .assert()
        .success();

    assert!(!ws.journal().exists());
}

#[test]
fn test_history_lists_sessions() {
    let ws = Workspace::new();
    ws.cli()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions recorded yet."));

    ws.run(FULL_SESSION).success();

    ws.cli()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("bench"))
        .stdout(predicate::str::contains("session finished: 168s"));
}

#[test]
fn test_missing_routine_fails() {
    let ws = Workspace::new();
    ws.cli()
        .arg("run")
        .arg("--routine")
        .arg(ws.dir.path().join("missing.toml"))
        .write_stdin("start\n")
        .assert()
        .failure();
}

#[test]
fn test_unknown_command_keeps_session_alive() {
    let ws = Workspace::new();
    ws.run("jump\nstart\ntick 3\nstatus\n")
        .success()
        .stdout(predicate::str::contains("unknown command 'jump'"))
        .stdout(predicate::str::contains("[Running] Bench Press (1/2) Series 1/2 3s"));
}
