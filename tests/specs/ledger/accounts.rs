//! Account operation specs
//!
//! Verify balances survive across invocations, each of which is a restart.

use crate::prelude::*;

#[test]
fn deposit_then_withdraw_leaves_fifteen() {
    let temp = Project::empty();
    temp.tally().args(&["open", "Alice"]).passes();
    temp.tally().args(&["deposit", "Alice", "20"]).passes();
    temp.tally().args(&["withdraw", "Alice", "5"]).passes();

    temp.tally().args(&["peek"]).passes().stdout_eq("Alice: 15\n");
}

#[test]
fn reopening_an_account_keeps_its_balance() {
    let temp = Project::empty();
    temp.tally().args(&["open", "Alice"]).passes();
    temp.tally().args(&["deposit", "Alice", "3"]).passes();
    temp.tally()
        .args(&["open", "Alice"])
        .passes()
        .stdout_eq("Opened account 'Alice'\n");

    temp.tally().args(&["inquire", "Alice"]).passes().stdout_eq("3\n");
}

#[test]
fn balances_may_go_negative() {
    let temp = Project::empty();
    temp.tally().args(&["open", "Alice"]).passes();
    temp.tally()
        .args(&["withdraw", "Alice", "8"])
        .passes()
        .stdout_eq("Alice: -8\n");
}

#[test]
fn transfer_moves_funds_between_accounts() {
    let temp = Project::empty();
    temp.tally().args(&["open", "Alice"]).passes();
    temp.tally().args(&["open", "Bob"]).passes();
    temp.tally().args(&["deposit", "Alice", "40"]).passes();
    temp.tally().args(&["transfer", "Alice", "Bob", "20"]).passes();

    temp.tally()
        .args(&["peek"])
        .passes()
        .stdout_eq("Alice: 20\nBob: 20\n");
}

#[test]
fn peek_json_lists_accounts_sorted() {
    let temp = Project::empty();
    temp.tally().args(&["open", "Bob"]).passes();
    temp.tally().args(&["open", "Alice"]).passes();
    temp.tally().args(&["deposit", "Bob", "2"]).passes();

    let run = temp.tally().args(&["peek", "--json"]).passes();
    let accounts: serde_json::Value = serde_json::from_str(&run.stdout).unwrap();
    similar_asserts::assert_eq!(
        accounts,
        serde_json::json!([
            { "name": "Alice", "balance": 0 },
            { "name": "Bob", "balance": 2 },
        ])
    );
}

#[test]
fn peek_on_empty_ledger() {
    let temp = Project::empty();
    temp.tally().args(&["peek"]).passes().stdout_eq("No accounts\n");
}
