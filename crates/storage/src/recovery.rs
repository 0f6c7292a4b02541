// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crash recovery
//!
//! Runs once at startup, before any new operation is accepted:
//!
//! 1. Analyze: scan the log for the latest record id and the final status
//!    of every transaction.
//! 2. Plan: replay forward if the snapshot is behind the log; undo backward
//!    any transaction that never committed or rolled back. The two are
//!    decided independently.
//! 3. Execute: reseed the id generators, replay, undo, and write a rollback
//!    marker for each undone transaction.

use crate::snapshot::{Accounts, SnapshotStore};
use crate::state::InMemoryStore;
use crate::transaction::TransactionCoordinator;
use crate::wal::WriteAheadLog;
use crate::StorageError;
use std::collections::BTreeMap;
use tally_core::{Operation, Record, TxStatus};
use tracing::info;

/// What a scan of the log found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Id of the last record in the log, 0 for an empty log
    pub latest_logged_id: u64,
    /// Final status per transaction id
    pub statuses: BTreeMap<u64, TxStatus>,
    /// Highest transaction id seen on any record
    pub highest_tx_id: u64,
}

impl Analysis {
    pub fn status(&self, tx_id: u64) -> Option<TxStatus> {
        self.statuses.get(&tx_id).copied()
    }

    /// Transactions still open, newest first
    pub fn open_transactions(&self) -> Vec<u64> {
        self.statuses
            .iter()
            .rev()
            .filter(|(_, status)| !status.is_closed())
            .map(|(tx_id, _)| *tx_id)
            .collect()
    }

    /// Decide what recovery has to do for a snapshot at `snapshot_log_id`.
    ///
    /// A single writer leaves at most one transaction open, but a log that
    /// was edited or spliced can hold more; every one of them is undone.
    pub fn plan(&self, snapshot_log_id: u64) -> RecoveryPlan {
        RecoveryPlan {
            replay_after: (snapshot_log_id < self.latest_logged_id).then_some(snapshot_log_id),
            undo: self.open_transactions(),
        }
    }
}

/// Scan records in log order
pub fn analyze(records: &[Record]) -> Analysis {
    let mut analysis = Analysis::default();

    for record in records {
        analysis.latest_logged_id = analysis.latest_logged_id.max(record.id);

        let Some(tx_id) = record.tx_id else {
            continue;
        };
        analysis.highest_tx_id = analysis.highest_tx_id.max(tx_id);

        if let Some(status) = TxStatus::from_marker(&record.operation) {
            analysis.statuses.insert(tx_id, status);
        }
    }

    analysis
}

/// Actions recovery will take
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryPlan {
    /// Replay every record after this id
    pub replay_after: Option<u64>,
    /// Transactions to undo, newest first
    pub undo: Vec<u64>,
}

impl RecoveryPlan {
    pub fn is_noop(&self) -> bool {
        self.replay_after.is_none() && self.undo.is_empty()
    }
}

/// Outcome of a recovery run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Create and update records reapplied
    pub replayed: usize,
    /// Create and update records reverted
    pub undone: usize,
    /// Transactions closed with a rollback marker
    pub rolled_back: Vec<u64>,
}

/// Reapply records after `after`, skipping rolled back transactions.
///
/// Returns the number of create and update records applied.
pub fn replay(records: &[Record], after: u64, analysis: &Analysis, accounts: &mut Accounts) -> usize {
    let mut applied = 0;

    for record in records.iter().filter(|r| r.id > after) {
        let rolled_back = record
            .tx_id
            .and_then(|tx_id| analysis.status(tx_id))
            .is_some_and(|status| status == TxStatus::RolledBack);
        if rolled_back {
            continue;
        }

        match &record.operation {
            Operation::Create { key } => {
                accounts.entry(key.clone()).or_insert(0);
                applied += 1;
            }
            Operation::Update { key, new_value, .. } => {
                accounts.insert(key.clone(), *new_value);
                applied += 1;
            }
            Operation::TxStart | Operation::TxCommit | Operation::TxRollback => {}
        }
    }

    applied
}

/// Revert every record of `tx_id`, newest first.
///
/// Returns the number of create and update records reverted.
pub fn undo(records: &[Record], tx_id: u64, accounts: &mut Accounts) -> usize {
    let mut reverted = 0;

    for record in records.iter().rev().filter(|r| r.tx_id == Some(tx_id)) {
        match &record.operation {
            Operation::Create { key } => {
                accounts.remove(key);
                reverted += 1;
            }
            Operation::Update { key, old_value, .. } => {
                accounts.insert(key.clone(), *old_value);
                reverted += 1;
            }
            Operation::TxStart | Operation::TxCommit | Operation::TxRollback => {}
        }
    }

    reverted
}

/// Bring `store` in line with the log and close torn transactions
pub fn recover<S: SnapshotStore>(
    wal: &mut WriteAheadLog,
    store: &mut InMemoryStore<S>,
    transactions: &mut TransactionCoordinator,
) -> Result<RecoveryReport, StorageError> {
    let records = wal.records()?;
    let analysis = analyze(&records);
    let snapshot_log_id = store.latest_log_id();
    let plan = analysis.plan(snapshot_log_id);

    // A snapshot ahead of the log still claims its ids
    wal.seed(analysis.latest_logged_id.max(snapshot_log_id));
    transactions.seed(analysis.highest_tx_id);

    let mut report = RecoveryReport::default();
    if plan.is_noop() {
        return Ok(report);
    }

    info!(
        records = records.len(),
        snapshot_log_id,
        latest_logged_id = analysis.latest_logged_id,
        replay_after = ?plan.replay_after,
        undo = ?plan.undo,
        "recovering"
    );

    if let Some(after) = plan.replay_after {
        store.recover(|accounts| {
            report.replayed = replay(&records, after, &analysis, accounts);
            analysis.latest_logged_id
        })?;
    }

    for &tx_id in &plan.undo {
        store.recover(|accounts| {
            report.undone += undo(&records, tx_id, accounts);
            analysis.latest_logged_id.max(snapshot_log_id)
        })?;
        wal.append_tx_rollback(tx_id)?;
        report.rolled_back.push(tx_id);
    }

    info!(
        replayed = report.replayed,
        undone = report.undone,
        rolled_back = ?report.rolled_back,
        "recovery complete"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
