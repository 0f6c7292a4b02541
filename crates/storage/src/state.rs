// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory account state backed by snapshots

use crate::persistence::PersistenceStrategy;
use crate::snapshot::{Accounts, SnapshotStore};
use crate::StorageError;

/// Live account map.
///
/// Tracks the id of the last log record applied to it, which may run ahead
/// of the snapshot between flushes. Every mutation is handed to the
/// persistence strategy afterwards.
#[derive(Debug)]
pub struct InMemoryStore<S> {
    accounts: Accounts,
    latest_log_id: u64,
    persistence: PersistenceStrategy<S>,
}

impl<S: SnapshotStore> InMemoryStore<S> {
    /// Load the latest snapshot from the strategy's store
    pub fn open(persistence: PersistenceStrategy<S>) -> Result<Self, StorageError> {
        let snapshot = persistence.store().load()?;
        Ok(Self {
            accounts: snapshot.state,
            latest_log_id: snapshot.last_log_id,
            persistence,
        })
    }

    /// Ensure `key` exists, starting at a balance of 0.
    ///
    /// Creating an existing key leaves its balance alone but still advances
    /// the tracked log id.
    pub fn create(&mut self, log_id: u64, key: &str) -> Result<(), StorageError> {
        self.latest_log_id = log_id;
        self.accounts.entry(key.to_string()).or_insert(0);
        self.persist()
    }

    pub fn read(&self, key: &str) -> Option<i64> {
        self.accounts.get(key).copied()
    }

    /// Overwrite the balance of an existing key
    pub fn update(&mut self, log_id: u64, key: &str, value: i64) -> Result<(), StorageError> {
        let Some(balance) = self.accounts.get_mut(key) else {
            return Err(StorageError::UnknownKey(key.to_string()));
        };
        *balance = value;
        self.latest_log_id = log_id;
        self.persist()
    }

    pub fn peek(&self) -> &Accounts {
        &self.accounts
    }

    /// Id of the last record reflected in memory
    pub fn latest_log_id(&self) -> u64 {
        self.latest_log_id
    }

    /// Unlogged access for recovery.
    ///
    /// `mutator` edits the raw map and returns the log id the result
    /// reflects; the outcome is then force-flushed.
    pub fn recover<F>(&mut self, mutator: F) -> Result<u64, StorageError>
    where
        F: FnOnce(&mut Accounts) -> u64,
    {
        self.latest_log_id = mutator(&mut self.accounts);
        self.persistence
            .force(&self.accounts, self.latest_log_id)?;
        Ok(self.latest_log_id)
    }

    pub fn persistence(&self) -> &PersistenceStrategy<S> {
        &self.persistence
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        self.persistence
            .persist(&self.accounts, self.latest_log_id)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
