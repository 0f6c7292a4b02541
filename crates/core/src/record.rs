// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log records and their line encoding
//!
//! One record per line:
//!
//! ```text
//! <id>,create[,<tx_id>]|<key>
//! <id>,update[,<tx_id>]|<key>,<old_value>,<new_value>
//! <id>,trx_start,<tx_id>
//! <id>,trx_commit,<tx_id>
//! <id>,trx_rollback,<tx_id>
//! ```

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Characters that delimit fields in the log and snapshot encodings
pub const RESERVED_KEY_CHARS: &[char] = &[',', '|', ':', '\n', '\r'];

/// Errors produced when a log line cannot be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    #[error("empty record")]
    Empty,
    #[error("missing record kind")]
    MissingKind,
    #[error("unknown record kind: {0}")]
    UnknownKind(String),
    #[error("invalid integer {field}: {value:?}")]
    InvalidInteger { field: &'static str, value: String },
    #[error("{0} record requires a transaction id")]
    MissingTransaction(&'static str),
    #[error("{0} record requires a payload")]
    MissingPayload(&'static str),
    #[error("{0} record does not take a payload")]
    UnexpectedPayload(&'static str),
    #[error("malformed update payload: {0:?}")]
    MalformedUpdate(String),
    #[error("unexpected trailing header fields: {0:?}")]
    TrailingFields(String),
}

/// The mutation or marker a record describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Create {
        key: String,
    },
    Update {
        key: String,
        old_value: i64,
        new_value: i64,
    },
    TxStart,
    TxCommit,
    TxRollback,
}

impl Operation {
    /// Kind tag used in the encoded header
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Create { .. } => "create",
            Operation::Update { .. } => "update",
            Operation::TxStart => "trx_start",
            Operation::TxCommit => "trx_commit",
            Operation::TxRollback => "trx_rollback",
        }
    }

    /// Transaction markers carry no payload and always name a transaction
    pub fn is_marker(&self) -> bool {
        matches!(
            self,
            Operation::TxStart | Operation::TxCommit | Operation::TxRollback
        )
    }
}

/// A single entry in the write-ahead log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: u64,
    pub tx_id: Option<u64>,
    pub operation: Operation,
}

impl Record {
    pub fn new(id: u64, tx_id: Option<u64>, operation: Operation) -> Self {
        Self {
            id,
            tx_id,
            operation,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.id, self.operation.kind())?;
        if let Some(tx_id) = self.tx_id {
            write!(f, ",{}", tx_id)?;
        }
        match &self.operation {
            Operation::Create { key } => write!(f, "|{}", key),
            Operation::Update {
                key,
                old_value,
                new_value,
            } => write!(f, "|{},{},{}", key, old_value, new_value),
            Operation::TxStart | Operation::TxCommit | Operation::TxRollback => Ok(()),
        }
    }
}

impl FromStr for Record {
    type Err = RecordParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            return Err(RecordParseError::Empty);
        }

        let (header, payload) = match line.split_once('|') {
            Some((header, payload)) => (header, Some(payload)),
            None => (line, None),
        };

        let mut fields = header.split(',').map(str::trim);
        let id = parse_u64("id", fields.next().unwrap_or_default())?;
        let kind = fields.next().ok_or(RecordParseError::MissingKind)?;
        let tx_id = fields.next().map(|v| parse_u64("tx_id", v)).transpose()?;
        let rest: Vec<&str> = fields.collect();
        if !rest.is_empty() {
            return Err(RecordParseError::TrailingFields(rest.join(",")));
        }

        let operation = match kind {
            "create" => {
                let key = payload
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .ok_or(RecordParseError::MissingPayload("create"))?;
                Operation::Create {
                    key: key.to_string(),
                }
            }
            "update" => {
                let payload = payload.ok_or(RecordParseError::MissingPayload("update"))?;
                parse_update(payload)?
            }
            "trx_start" => Operation::TxStart,
            "trx_commit" => Operation::TxCommit,
            "trx_rollback" => Operation::TxRollback,
            other => return Err(RecordParseError::UnknownKind(other.to_string())),
        };

        if operation.is_marker() {
            if tx_id.is_none() {
                return Err(RecordParseError::MissingTransaction(operation.kind()));
            }
            if payload.is_some() {
                return Err(RecordParseError::UnexpectedPayload(operation.kind()));
            }
        }

        Ok(Record {
            id,
            tx_id,
            operation,
        })
    }
}

fn parse_update(payload: &str) -> Result<Operation, RecordParseError> {
    let parts: Vec<&str> = payload.split(',').map(str::trim).collect();
    let [key, old_value, new_value] = parts.as_slice() else {
        return Err(RecordParseError::MalformedUpdate(payload.to_string()));
    };
    if key.is_empty() {
        return Err(RecordParseError::MalformedUpdate(payload.to_string()));
    }
    Ok(Operation::Update {
        key: key.to_string(),
        old_value: parse_i64("old_value", old_value)?,
        new_value: parse_i64("new_value", new_value)?,
    })
}

fn parse_u64(field: &'static str, value: &str) -> Result<u64, RecordParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| RecordParseError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

fn parse_i64(field: &'static str, value: &str) -> Result<i64, RecordParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| RecordParseError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

/// Whether `key` can be stored without colliding with the encodings
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty() && key.trim() == key && !key.contains(RESERVED_KEY_CHARS)
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
