//! Crash recovery specs
//!
//! Each spec leaves the data directory the way a crashed process would,
//! then checks what the next invocation sees.

use crate::prelude::*;

#[test]
fn half_logged_transfer_is_rolled_back() {
    let temp = Project::empty();
    temp.file(
        "tally.wal",
        "1,create|Alice\n\
         2,create|Bob\n\
         3,trx_start,1\n\
         4,update,1|Alice,0,-5\n\
         5,update,1|Bob,0,5\n",
    );

    temp.tally()
        .args(&["peek"])
        .passes()
        .stdout_eq("Alice: 0\nBob: 0\n");

    let wal = temp.read("tally.wal");
    assert!(wal.ends_with("6,trx_rollback,1\n"), "wal was:\n{}", wal);
    assert_eq!(wal.matches("trx_rollback").count(), 1);

    // A second restart finds nothing left to undo
    temp.tally().args(&["peek"]).passes();
    assert_eq!(temp.read("tally.wal").matches("trx_rollback").count(), 1);
}

#[test]
fn snapshot_behind_log_is_replayed() {
    let temp = Project::empty();
    temp.file("tally.snapshot", "2\nAlice:20\n");
    temp.file(
        "tally.wal",
        "1,create|Alice\n\
         2,update|Alice,0,20\n\
         3,update|Alice,20,15\n",
    );

    temp.tally().args(&["inquire", "Alice"]).passes().stdout_eq("15\n");
    assert_eq!(temp.read("tally.snapshot"), "3\nAlice:15\n");
}

#[test]
fn torn_final_line_is_discarded() {
    let temp = Project::empty();
    temp.file("tally.wal", "1,create|Alice\n2,update|Alice,0,2");

    temp.tally().args(&["inquire", "Alice"]).passes().stdout_eq("0\n");
    temp.tally().args(&["deposit", "Alice", "1"]).passes();

    temp.tally()
        .args(&["log"])
        .passes()
        .stdout_eq("1,create|Alice\n2,update|Alice,0,1\n");
}

#[test]
fn rolled_back_transaction_is_not_replayed() {
    let temp = Project::empty();
    temp.file(
        "tally.wal",
        "1,create|Alice\n\
         2,create|Bob\n\
         3,trx_start,1\n\
         4,update,1|Bob,0,5\n\
         5,trx_rollback,1\n",
    );

    temp.tally()
        .args(&["peek"])
        .passes()
        .stdout_eq("Alice: 0\nBob: 0\n");
}
