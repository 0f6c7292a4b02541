// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger operations over the log, the live state and the snapshot

use crate::persistence::PersistenceStrategy;
use crate::recovery::{self, RecoveryReport};
use crate::snapshot::{Accounts, FileSnapshotStore, SnapshotStore};
use crate::state::InMemoryStore;
use crate::transaction::TransactionCoordinator;
use crate::wal::WriteAheadLog;
use crate::StorageError;
use tally_core::{is_valid_key, ConfigError, LedgerConfig};
use thiserror::Error;
use tracing::info;

/// Errors returned by ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("unknown account: {0}")]
    UnknownAccount(String),

    #[error("invalid account name: {0:?}")]
    InvalidAccountName(String),

    #[error("amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("balance overflow on account {0}")]
    Overflow(String),

    #[error("transaction {tx_id} was aborted; restart to roll it back")]
    TransactionAborted { tx_id: u64 },
}

/// Account balances with write-ahead logging and crash recovery.
///
/// Every mutation is appended to the log before it touches the live state.
/// Opening a ledger runs recovery before any operation is accepted.
pub struct Ledger<S = FileSnapshotStore> {
    wal: WriteAheadLog,
    state: InMemoryStore<S>,
    transactions: TransactionCoordinator,
    recovery: RecoveryReport,
}

impl Ledger<FileSnapshotStore> {
    /// Open the ledger described by `config`
    pub fn open(config: &LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        let wal = WriteAheadLog::open(&config.wal_path)?;
        let store = FileSnapshotStore::new(&config.snapshot_path);
        Self::with_parts(
            wal,
            PersistenceStrategy::from_config(config.persistence, store),
        )
    }
}

impl<S: SnapshotStore> Ledger<S> {
    /// Load the snapshot behind `persistence` and recover from `wal`
    pub fn with_parts(
        mut wal: WriteAheadLog,
        persistence: PersistenceStrategy<S>,
    ) -> Result<Self, LedgerError> {
        let mut state = InMemoryStore::open(persistence)?;
        let mut transactions = TransactionCoordinator::new();
        let recovery = recovery::recover(&mut wal, &mut state, &mut transactions)?;

        info!(
            wal = %wal.path().display(),
            accounts = state.peek().len(),
            last_log_id = wal.last_id(),
            "ledger opened"
        );

        Ok(Self {
            wal,
            state,
            transactions,
            recovery,
        })
    }

    /// Create an account with a zero balance. Opening an existing account
    /// is logged but leaves the balance alone.
    pub fn open_account(&mut self, name: &str) -> Result<(), LedgerError> {
        self.ensure_writable()?;
        if !is_valid_key(name) {
            return Err(LedgerError::InvalidAccountName(name.to_string()));
        }
        let log_id = self.wal.append_create(name, None)?;
        self.state.create(log_id, name)?;
        Ok(())
    }

    pub fn inquire(&self, name: &str) -> Option<i64> {
        self.state.read(name)
    }

    /// Add `amount` to an account, returning the new balance
    pub fn deposit(&mut self, name: &str, amount: i64) -> Result<i64, LedgerError> {
        self.ensure_writable()?;
        let amount = positive(amount)?;
        adjust(&mut self.wal, &mut self.state, name, amount, None)
    }

    /// Subtract `amount` from an account, returning the new balance.
    /// Balances may go negative.
    pub fn withdraw(&mut self, name: &str, amount: i64) -> Result<i64, LedgerError> {
        self.ensure_writable()?;
        let amount = positive(amount)?;
        adjust(&mut self.wal, &mut self.state, name, -amount, None)
    }

    /// Move `amount` between accounts atomically with respect to crashes
    pub fn transfer(&mut self, from: &str, to: &str, amount: i64) -> Result<(), LedgerError> {
        self.ensure_writable()?;
        let amount = positive(amount)?;
        let from_balance = self.balance(from)?;
        let to_balance = self.balance(to)?;

        // Both legs must fit before the transaction starts; the credit lands first
        let credited = to_balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow(to.to_string()))?;
        let debit_from = if from == to { credited } else { from_balance };
        debit_from
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::Overflow(from.to_string()))?;

        let state = &mut self.state;
        self.transactions
            .transaction(&mut self.wal, |wal, tx_id| -> Result<(), LedgerError> {
                adjust(wal, state, to, amount, Some(tx_id))?;
                adjust(wal, state, from, -amount, Some(tx_id))?;
                Ok(())
            })
    }

    /// Current balances
    pub fn peek(&self) -> &Accounts {
        self.state.peek()
    }

    /// What recovery did when this ledger was opened
    pub fn recovery_report(&self) -> &RecoveryReport {
        &self.recovery
    }

    pub fn wal(&self) -> &WriteAheadLog {
        &self.wal
    }

    pub fn state(&self) -> &InMemoryStore<S> {
        &self.state
    }

    fn balance(&self, name: &str) -> Result<i64, LedgerError> {
        self.state
            .read(name)
            .ok_or_else(|| LedgerError::UnknownAccount(name.to_string()))
    }

    /// Refuse mutations while an aborted transaction awaits recovery
    fn ensure_writable(&self) -> Result<(), LedgerError> {
        match self.transactions.open_transaction() {
            Some(tx_id) => Err(LedgerError::TransactionAborted { tx_id }),
            None => Ok(()),
        }
    }
}

/// Log then apply `delta` to an existing account
fn adjust<S: SnapshotStore>(
    wal: &mut WriteAheadLog,
    state: &mut InMemoryStore<S>,
    name: &str,
    delta: i64,
    tx_id: Option<u64>,
) -> Result<i64, LedgerError> {
    let balance = state
        .read(name)
        .ok_or_else(|| LedgerError::UnknownAccount(name.to_string()))?;
    let new_balance = balance
        .checked_add(delta)
        .ok_or_else(|| LedgerError::Overflow(name.to_string()))?;

    let log_id = wal.append_update(name, balance, new_balance, tx_id)?;
    state.update(log_id, name, new_balance)?;
    Ok(new_balance)
}

fn positive(amount: i64) -> Result<i64, LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(amount)
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
