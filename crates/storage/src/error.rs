// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised by the storage layer

use std::io;
use tally_core::{IdsExhausted, RecordParseError};
use thiserror::Error;

/// Errors that can occur while logging, snapshotting or recovering
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("corrupt record at {path}:{line}: {source}")]
    CorruptRecord {
        path: String,
        line: usize,
        #[source]
        source: RecordParseError,
    },

    #[error("record {id} at {path}:{line} does not follow record {previous}")]
    OutOfOrder {
        path: String,
        line: usize,
        id: u64,
        previous: u64,
    },

    #[error("corrupt snapshot at {path}:{line}: {reason}")]
    CorruptSnapshot {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("unknown key: {0}")]
    UnknownKey(String),

    #[error("transaction {0} is still open")]
    TransactionOpen(u64),

    #[error(transparent)]
    IdsExhausted(#[from] IdsExhausted),
}
