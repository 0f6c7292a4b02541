// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential ID generation for log records and transactions

use thiserror::Error;

/// Every id up to `u64::MAX` has been handed out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("id sequence exhausted after {last}")]
pub struct IdsExhausted {
    pub last: u64,
}

/// Produces strictly increasing identifiers starting at 1.
///
/// Each owner (the write-ahead log, the transaction coordinator) holds its
/// own generator, so independent ledgers never share a counter.
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    last: u64,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Advance the counter and return the new id
    pub fn next(&mut self) -> Result<u64, IdsExhausted> {
        let id = self
            .last
            .checked_add(1)
            .ok_or(IdsExhausted { last: self.last })?;
        self.last = id;
        Ok(id)
    }

    /// Continue numbering after `value`.
    ///
    /// Seeding below an id that was already issued leaves the counter alone,
    /// so ids are never handed out twice.
    pub fn seed(&mut self, value: u64) {
        self.last = self.last.max(value);
    }

    /// The most recently issued id, or 0 if none was issued yet
    pub fn current(&self) -> u64 {
        self.last
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}
