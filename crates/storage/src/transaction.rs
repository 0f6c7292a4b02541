// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transaction bracketing
//!
//! A transaction is a start marker, the body's records tagged with the
//! transaction id, and a commit marker. There is no live rollback: if the
//! body fails the commit is never written and recovery undoes the
//! transaction on the next startup.

use crate::wal::WriteAheadLog;
use crate::StorageError;
use tally_core::SequenceGenerator;
use tracing::{debug, warn};

/// Allocates transaction ids and writes the markers around a body
#[derive(Debug, Default)]
pub struct TransactionCoordinator {
    ids: SequenceGenerator,
    /// Id of a transaction whose body failed
    open: Option<u64>,
}

impl TransactionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `body` inside a new transaction.
    ///
    /// The body receives the log and the transaction id to tag its records
    /// with. On error the transaction stays open and no further transaction
    /// may start in this process.
    pub fn transaction<T, E, F>(&mut self, wal: &mut WriteAheadLog, body: F) -> Result<T, E>
    where
        F: FnOnce(&mut WriteAheadLog, u64) -> Result<T, E>,
        E: From<StorageError>,
    {
        if let Some(open) = self.open {
            return Err(StorageError::TransactionOpen(open).into());
        }

        let tx_id = self.ids.next().map_err(StorageError::from)?;
        wal.append_tx_start(tx_id)?;
        debug!(tx_id, "transaction started");

        let value = match body(wal, tx_id) {
            Ok(value) => value,
            Err(e) => {
                self.open = Some(tx_id);
                warn!(tx_id, "transaction aborted, left open for recovery");
                return Err(e);
            }
        };

        if let Err(e) = wal.append_tx_commit(tx_id) {
            self.open = Some(tx_id);
            return Err(e.into());
        }
        debug!(tx_id, "transaction committed");
        Ok(value)
    }

    /// Transaction left open by a failed body, if any
    pub fn open_transaction(&self) -> Option<u64> {
        self.open
    }

    /// Continue transaction numbering after `tx_id`
    pub fn seed(&mut self, tx_id: u64) {
        self.ids.seed(tx_id);
    }

    /// Last transaction id handed out, or the seed
    pub fn last_id(&self) -> u64 {
        self.ids.current()
    }
}

#[cfg(test)]
#[path = "transaction_tests.rs"]
mod tests;
