//! Configuration specs
//!
//! Verify tally.toml and the persistence flags.

use crate::prelude::*;

#[test]
fn config_file_relocates_log_and_snapshot() {
    let temp = Project::empty();
    temp.file(
        "tally.toml",
        r#"
wal_path = "data/ledger.wal"
snapshot_path = "data/ledger.snapshot"

[persistence]
strategy = "immediate"
"#,
    );

    temp.tally().args(&["open", "Alice"]).passes();
    temp.tally().args(&["deposit", "Alice", "9"]).passes();

    assert_eq!(temp.read("data/ledger.wal"), "1,create|Alice\n2,update|Alice,0,9\n");
    assert_eq!(temp.read("data/ledger.snapshot"), "2\nAlice:9\n");
    assert!(!temp.path().join("tally.wal").exists());
}

#[test]
fn explicit_config_flag_is_used() {
    let temp = Project::empty();
    temp.file("conf/other.toml", "wal_path = \"other.wal\"\n");
    let config = temp.path().join("conf/other.toml");

    temp.tally()
        .args(&["--config", &config.display().to_string(), "open", "Alice"])
        .passes();

    assert_eq!(temp.read("other.wal"), "1,create|Alice\n");
}

#[test]
fn buffered_threshold_delays_snapshot() {
    let temp = Project::empty();
    temp.tally().args(&["open", "Alice"]).passes();

    // Each invocation is one mutation after recovery flushed the previous ones
    temp.tally()
        .args(&["--threshold", "3", "deposit", "Alice", "1"])
        .passes();
    assert_eq!(temp.read("tally.snapshot"), "1\nAlice:0\n");
}

#[test]
fn immediate_flag_overrides_config_file() {
    let temp = Project::empty();
    temp.file("tally.toml", "[persistence]\nstrategy = \"buffered\"\nthreshold = 50\n");

    temp.tally()
        .args(&["--strategy", "immediate", "open", "Alice"])
        .passes();
    assert_eq!(temp.read("tally.snapshot"), "1\nAlice:0\n");
}

#[test]
fn unknown_config_key_is_rejected() {
    let temp = Project::empty();
    temp.file("tally.toml", "wal = \"x.wal\"\n");

    temp.tally()
        .args(&["peek"])
        .fails()
        .stderr_has("error: Invalid configuration");
}
