//! End-to-end tests driving the `stt` binary against real files.
//!
//! Each test runs with `HOME` and the config directory pointed at a temp dir
//! so no user configuration leaks in.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn stt_binary() -> String {
    env!("CARGO_BIN_EXE_stt").to_string()
}

fn stt(home: &Path, args: &[&str]) -> Output {
    Command::new(stt_binary())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run stt")
}

fn stt_ok(home: &Path, args: &[&str]) -> String {
    let output = stt(home, args);
    assert!(
        output.status.success(),
        "stt {args:?} should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

/// Test the full flow: insert, start, continue, stop, remove, export.
#[test]
fn test_tracking_flow_edits_block_in_place() {
    let temp = TempDir::new().unwrap();
    let note = temp.path().join("monday.md");
    std::fs::write(&note, "# Monday\n\nSome notes.\n").unwrap();
    let note_arg = note.to_str().unwrap();

    let output = stt_ok(temp.path(), &["insert", note_arg]);
    assert!(output.contains("Inserted tracker block 1"));

    let output = stt_ok(temp.path(), &["start", note_arg, "--name", "Planning"]);
    assert_eq!(output.trim(), "Started 1 Planning");

    // Second start is refused while Planning runs
    let refused = stt(temp.path(), &["start", note_arg]);
    assert!(!refused.status.success());
    assert!(String::from_utf8_lossy(&refused.stderr).contains("already running"));

    stt_ok(temp.path(), &["stop", note_arg]);
    let output = stt_ok(temp.path(), &["continue", note_arg, "1"]);
    assert_eq!(output.trim(), "Continued 1 as 1.2 Part 2");
    stt_ok(temp.path(), &["stop", note_arg]);
    stt_ok(temp.path(), &["edit", note_arg, "1.2", "--name", "Follow-up"]);

    let content = std::fs::read_to_string(&note).unwrap();
    assert!(content.starts_with("# Monday\n\nSome notes.\n```simple-time-tracker\n"));
    assert!(content.ends_with("\n```\n"));
    assert!(content.contains("\"name\":\"Follow-up\""));

    let csv = stt_ok(temp.path(), &["export", note_arg, "--format", "csv"]);
    let names: Vec<&str> = csv
        .lines()
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(names, vec!["Planning", "Part 1", "Follow-up", "Total"]);

    let output = stt_ok(temp.path(), &["remove", note_arg, "1.1"]);
    assert_eq!(output.trim(), "Removed 1.1 Part 1");
    let content = std::fs::read_to_string(&note).unwrap();
    assert!(!content.contains("subEntries"));
}

/// Test that commands address the selected block and leave others alone.
#[test]
fn test_block_selection() {
    let temp = TempDir::new().unwrap();
    let note = temp.path().join("week.md");
    let note_arg = note.to_str().unwrap();

    stt_ok(temp.path(), &["insert", note_arg]);
    stt_ok(temp.path(), &["insert", note_arg]);
    stt_ok(temp.path(), &["punch-in", note_arg, "--block", "2"]);

    let blocks: serde_json::Value =
        serde_json::from_str(&stt_ok(temp.path(), &["list", note_arg, "--json"])).unwrap();
    assert_eq!(blocks.as_array().unwrap().len(), 2);
    assert!(blocks[0]["punched_in"].is_null());
    assert!(blocks[1]["punched_in"].is_i64());

    let missing = stt(temp.path(), &["show", note_arg, "--block", "3"]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("no tracker block 3"));
}

/// Test that an unreadable block is reported and never overwritten.
#[test]
fn test_unreadable_block_is_preserved() {
    let temp = TempDir::new().unwrap();
    let note = temp.path().join("broken.md");
    let original = "```simple-time-tracker\n{\"entries\": [oops\n```\n";
    std::fs::write(&note, original).unwrap();
    let note_arg = note.to_str().unwrap();

    let output = stt(temp.path(), &["start", note_arg]);
    assert!(!output.status.success());
    assert_eq!(std::fs::read_to_string(&note).unwrap(), original);

    let listing = stt_ok(temp.path(), &["list", note_arg]);
    assert!(listing.contains("unreadable"));
}

/// Test that a legacy tracker is upgraded when it is next written.
#[test]
fn test_legacy_tracker_is_migrated_on_write() {
    let temp = TempDir::new().unwrap();
    let note = temp.path().join("legacy.md");
    std::fs::write(
        &note,
        "```simple-time-tracker\n{\"entries\":[{\"name\":\"Old\",\"startTime\":1700000000,\"endTime\":\"1700003600\",\"subEntries\":null}]}\n```\n",
    )
    .unwrap();
    let note_arg = note.to_str().unwrap();

    stt_ok(temp.path(), &["collapse", note_arg, "1"]);

    let content = std::fs::read_to_string(&note).unwrap();
    assert!(content.contains("\"startTime\":\"2023-11-14T22:13:20.000Z\""));
    assert!(content.contains("\"endTime\":\"2023-11-14T23:13:20.000Z\""));
    assert!(!content.contains("subEntries"));
}

/// Test that configuration is read from the --config file.
#[test]
fn test_config_file_controls_output() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("stt.toml");
    std::fs::write(
        &config,
        "[display]\ncsv_delimiter = \";\"\nenable_punch_in_out = false\n",
    )
    .unwrap();
    let note = temp.path().join("day.md");
    std::fs::write(
        &note,
        "```simple-time-tracker\n{\"entries\":[{\"name\":\"Work\",\"startTime\":\"2024-01-01T09:00:00.000Z\",\"endTime\":\"2024-01-01T10:00:00.000Z\"}]}\n```\n",
    )
    .unwrap();
    let config_arg = config.to_str().unwrap();
    let note_arg = note.to_str().unwrap();

    let csv = stt_ok(
        temp.path(),
        &["--config", config_arg, "export", note_arg, "-f", "csv"],
    );
    assert!(csv.ends_with("Total;;;1h 0m 0s\n"));

    let refused = stt(temp.path(), &["-c", config_arg, "punch-in", note_arg]);
    assert!(!refused.status.success());
    assert!(String::from_utf8_lossy(&refused.stderr).contains("disabled"));
}

/// Test that submitting an unpunched day fails before any network call.
#[test]
fn test_submit_dry_run_requires_punch() {
    let temp = TempDir::new().unwrap();
    let note = temp.path().join("day.md");
    let note_arg = note.to_str().unwrap();
    stt_ok(temp.path(), &["insert", note_arg]);

    let output = stt(temp.path(), &["submit", note_arg, "--dry-run"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("punch in and out"));

    stt_ok(temp.path(), &["punch-in", note_arg]);
    stt_ok(temp.path(), &["punch-out", note_arg]);
    let request: serde_json::Value =
        serde_json::from_str(&stt_ok(temp.path(), &["submit", note_arg, "--dry-run"])).unwrap();
    assert_eq!(request["status"], "REQUESTED");
    assert_eq!(request["comment"], "");
}
