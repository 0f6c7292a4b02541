// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot persistence strategies
//!
//! Decides, after each mutation, whether the in-memory accounts are dumped
//! to the snapshot store. Recovery bypasses the policy with [`force`].
//!
//! [`force`]: PersistenceStrategy::force

use crate::snapshot::{Accounts, SnapshotStore};
use crate::StorageError;
use tally_core::PersistenceConfig;

/// When to flush in-memory state to the snapshot store
#[derive(Debug)]
pub enum PersistenceStrategy<S> {
    /// Dump on every mutation
    Immediate { store: S },
    /// Dump once every `threshold` mutations
    Buffered {
        store: S,
        threshold: usize,
        pending: usize,
    },
}

impl<S: SnapshotStore> PersistenceStrategy<S> {
    pub fn immediate(store: S) -> Self {
        PersistenceStrategy::Immediate { store }
    }

    /// A threshold of 0 behaves like 1
    pub fn buffered(store: S, threshold: usize) -> Self {
        PersistenceStrategy::Buffered {
            store,
            threshold: threshold.max(1),
            pending: 0,
        }
    }

    pub fn from_config(config: PersistenceConfig, store: S) -> Self {
        match config {
            PersistenceConfig::Immediate => Self::immediate(store),
            PersistenceConfig::Buffered { threshold } => Self::buffered(store, threshold),
        }
    }

    /// Record a mutation, dumping if the policy calls for it.
    ///
    /// Returns whether a snapshot was written.
    pub fn persist(&mut self, state: &Accounts, last_log_id: u64) -> Result<bool, StorageError> {
        match self {
            PersistenceStrategy::Immediate { store } => {
                store.dump(state, last_log_id)?;
                Ok(true)
            }
            PersistenceStrategy::Buffered {
                store,
                threshold,
                pending,
            } => {
                *pending += 1;
                if *pending < *threshold {
                    return Ok(false);
                }
                store.dump(state, last_log_id)?;
                *pending = 0;
                Ok(true)
            }
        }
    }

    /// Dump regardless of policy and reset any pending count
    pub fn force(&mut self, state: &Accounts, last_log_id: u64) -> Result<(), StorageError> {
        match self {
            PersistenceStrategy::Immediate { store } => store.dump(state, last_log_id),
            PersistenceStrategy::Buffered { store, pending, .. } => {
                store.dump(state, last_log_id)?;
                *pending = 0;
                Ok(())
            }
        }
    }

    /// Mutations recorded since the last dump
    pub fn pending(&self) -> usize {
        match self {
            PersistenceStrategy::Immediate { .. } => 0,
            PersistenceStrategy::Buffered { pending, .. } => *pending,
        }
    }

    pub fn store(&self) -> &S {
        match self {
            PersistenceStrategy::Immediate { store } | PersistenceStrategy::Buffered { store, .. } => {
                store
            }
        }
    }
}

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;
