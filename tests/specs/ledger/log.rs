//! Log inspection specs
//!
//! Verify the write-ahead log line format as printed by `tally log`.

use crate::prelude::*;

#[test]
fn log_prints_records_in_order() {
    let temp = Project::empty();
    temp.tally().args(&["open", "Alice"]).passes();
    temp.tally().args(&["open", "Bob"]).passes();
    temp.tally().args(&["deposit", "Alice", "20"]).passes();
    temp.tally().args(&["transfer", "Alice", "Bob", "5"]).passes();

    temp.tally().args(&["log"]).passes().stdout_eq(
        "1,create|Alice\n\
         2,create|Bob\n\
         3,update|Alice,0,20\n\
         4,trx_start,1\n\
         5,update,1|Bob,0,5\n\
         6,update,1|Alice,20,15\n\
         7,trx_commit,1\n",
    );
}

#[test]
fn log_after_skips_earlier_records() {
    let temp = Project::empty();
    temp.tally().args(&["open", "Alice"]).passes();
    temp.tally().args(&["deposit", "Alice", "20"]).passes();

    temp.tally()
        .args(&["log", "--after", "1"])
        .passes()
        .stdout_eq("2,update|Alice,0,20\n");
}

#[test]
fn log_file_matches_printed_log() {
    let temp = Project::empty();
    temp.tally().args(&["open", "Alice"]).passes();
    temp.tally().args(&["deposit", "Alice", "4"]).passes();

    let run = temp.tally().args(&["log"]).passes();
    similar_asserts::assert_eq!(temp.read("tally.wal"), run.stdout);
}

#[test]
fn transaction_ids_continue_after_restart() {
    let temp = Project::empty();
    temp.tally().args(&["open", "Alice"]).passes();
    temp.tally().args(&["open", "Bob"]).passes();
    temp.tally().args(&["transfer", "Alice", "Bob", "1"]).passes();
    temp.tally().args(&["transfer", "Bob", "Alice", "1"]).passes();

    temp.tally()
        .args(&["log", "--after", "6"])
        .passes()
        .stdout_eq(
            "7,trx_start,2\n\
             8,update,2|Alice,-1,0\n\
             9,update,2|Bob,1,0\n\
             10,trx_commit,2\n",
        );
}
