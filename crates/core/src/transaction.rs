// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transaction lifecycle as recorded in the log

use crate::record::Operation;
use std::fmt;

/// Status of a transaction, derived from its marker records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Started,
    Committed,
    RolledBack,
}

impl TxStatus {
    /// Status implied by a marker operation, `None` for data records
    pub fn from_marker(operation: &Operation) -> Option<Self> {
        match operation {
            Operation::TxStart => Some(TxStatus::Started),
            Operation::TxCommit => Some(TxStatus::Committed),
            Operation::TxRollback => Some(TxStatus::RolledBack),
            Operation::Create { .. } | Operation::Update { .. } => None,
        }
    }

    /// Whether the transaction reached a final state
    pub fn is_closed(&self) -> bool {
        !matches!(self, TxStatus::Started)
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStatus::Started => write!(f, "started"),
            TxStatus::Committed => write!(f, "committed"),
            TxStatus::RolledBack => write!(f, "rolled back"),
        }
    }
}
