//! CLI error specs
//!
//! Verify failures print a message with suggestions and exit non-zero.

use crate::prelude::*;

#[test]
fn unknown_account_suggests_open() {
    let temp = Project::empty();
    temp.tally()
        .args(&["inquire", "Bob"])
        .fails()
        .stderr_has("error: Account 'Bob' not found")
        .stderr_has("tally open Bob");
}

#[test]
fn non_positive_amount_is_rejected() {
    let temp = Project::empty();
    temp.tally().args(&["open", "Alice"]).passes();
    temp.tally()
        .args(&["deposit", "Alice", "0"])
        .fails()
        .stderr_has("error: Invalid amount 0");

    temp.tally().args(&["log"]).passes().stdout_eq("1,create|Alice\n");
}

#[test]
fn reserved_characters_in_names_are_rejected() {
    let temp = Project::empty();
    temp.tally()
        .args(&["open", "A|B"])
        .fails()
        .stderr_has("Invalid account name");
}

#[test]
fn corrupt_log_reports_location() {
    let temp = Project::empty();
    temp.file("tally.wal", "1,create|Alice\n2,explode|Alice\n3,create|Bob\n");

    temp.tally()
        .args(&["peek"])
        .fails()
        .stderr_has("error: Write-ahead log is corrupt")
        .stderr_has("tally.wal:2");
}

#[test]
fn out_of_order_log_is_rejected() {
    let temp = Project::empty();
    temp.file("tally.wal", "1,create|Alice\n1,create|Bob\n");

    temp.tally()
        .args(&["peek"])
        .fails()
        .stderr_has("record 1 does not follow record 1");
}

#[test]
fn commands_stay_quiet_by_default() {
    let temp = Project::empty();
    temp.file("tally.wal", "1,create|Alice\n2,trx_start,1\n");

    // Recovery logs at info, below the default filter
    temp.tally()
        .args(&["peek"])
        .passes()
        .stderr_lacks("recovering");
}
