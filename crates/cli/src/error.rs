// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Ledger and storage failures are mapped to a message, what likely caused
//! them, and the command that gets the user unstuck.

use std::fmt;
use tally_core::ConfigError;
use tally_storage::{LedgerError, StorageError};

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct TallyError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl TallyError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Pick the most helpful rendering for an error bubbled up from a command
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        if let Some(e) = err.downcast_ref::<LedgerError>() {
            return Self::from_ledger(e);
        }
        if let Some(e) = err.downcast_ref::<StorageError>() {
            return Self::from_storage(e);
        }
        if let Some(e) = err.downcast_ref::<ConfigError>() {
            return Self::from_config(e);
        }
        let mut out = TallyError::new(err.to_string());
        for cause in err.chain().skip(1) {
            out = out.with_context(cause.to_string());
        }
        out
    }

    fn from_ledger(err: &LedgerError) -> Self {
        match err {
            LedgerError::Storage(e) => Self::from_storage(e),
            LedgerError::Config(e) => Self::from_config(e),
            LedgerError::UnknownAccount(name) => Self::unknown_account(name),
            LedgerError::InvalidAccountName(name) => {
                TallyError::new(format!("Invalid account name {:?}", name))
                    .with_context("Names must be non-empty and cannot contain ',', '|', ':' or newlines")
            }
            LedgerError::InvalidAmount(amount) => {
                TallyError::new(format!("Invalid amount {}", amount))
                    .with_context("Amounts must be greater than zero")
                    .with_suggestion("Use withdraw instead of a negative deposit")
            }
            LedgerError::Overflow(name) => {
                TallyError::new(format!("Balance of '{}' would overflow", name))
                    .with_context("Balances are signed 64-bit integers")
            }
            LedgerError::TransactionAborted { tx_id } => Self::transaction_aborted(*tx_id),
        }
    }

    fn from_storage(err: &StorageError) -> Self {
        match err {
            StorageError::CorruptRecord { path, line, source } => {
                Self::corrupt_log(path, *line, &source.to_string())
            }
            StorageError::OutOfOrder {
                path,
                line,
                id,
                previous,
            } => Self::corrupt_log(
                path,
                *line,
                &format!("record {} does not follow record {}", id, previous),
            ),
            StorageError::CorruptSnapshot { path, line, reason } => {
                TallyError::new("Snapshot file is corrupt")
                    .with_context(format!("{}:{}: {}", path, line, reason))
                    .with_suggestion(format!(
                        "Move {} aside; the ledger is rebuilt from the log",
                        path
                    ))
            }
            other => TallyError::new(other.to_string()),
        }
    }

    fn from_config(err: &ConfigError) -> Self {
        TallyError::new("Invalid configuration")
            .with_context(err.to_string())
            .with_suggestion("Check tally.toml or the --strategy/--threshold flags")
    }

    /// Error for when an account has not been opened.
    pub fn unknown_account(name: &str) -> Self {
        TallyError::new(format!("Account '{}' not found", name))
            .with_suggestion(format!("Open it first: tally open {}", name))
            .with_suggestion("List accounts: tally peek")
    }

    /// Error for when a transaction failed part way and the ledger refuses writes.
    pub fn transaction_aborted(tx_id: u64) -> Self {
        TallyError::new(format!("Transaction {} was aborted", tx_id))
            .with_context("Part of the transaction was logged before it failed")
            .with_suggestion("Run any tally command again; recovery rolls it back on open")
    }

    /// Error for when the write-ahead log cannot be parsed.
    pub fn corrupt_log(path: &str, line: usize, reason: &str) -> Self {
        TallyError::new("Write-ahead log is corrupt")
            .with_context(format!("{}:{}: {}", path, line, reason))
            .with_context("This may be caused by editing the log by hand or disk corruption")
            .with_suggestion(format!("Inspect the log: tally log, or open {}", path))
    }
}

impl fmt::Display for TallyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for TallyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TallyError::new("Something went wrong")
            .with_context("First context")
            .with_context("Second context")
            .with_suggestion("Try this")
            .with_suggestion("Or this");

        let output = format!("{}", err);
        assert!(output.contains("error: Something went wrong"));
        assert!(output.contains("-> First context"));
        assert!(output.contains("-> Second context"));
        assert!(output.contains("1. Try this"));
        assert!(output.contains("2. Or this"));
    }

    #[test]
    fn test_unknown_account_suggests_open() {
        let err = anyhow::Error::new(LedgerError::UnknownAccount("Bob".to_string()));
        let output = TallyError::from_anyhow(&err).to_string();
        assert!(output.contains("Account 'Bob' not found"));
        assert!(output.contains("tally open Bob"));
    }

    #[test]
    fn test_storage_error_inside_ledger_error() {
        let err = anyhow::Error::new(LedgerError::Storage(StorageError::OutOfOrder {
            path: "tally.wal".to_string(),
            line: 3,
            id: 2,
            previous: 2,
        }));
        let output = TallyError::from_anyhow(&err).to_string();
        assert!(output.contains("Write-ahead log is corrupt"));
        assert!(output.contains("tally.wal:3"));
    }

    #[test]
    fn test_plain_error_keeps_chain() {
        let err = anyhow::anyhow!("disk full").context("cannot write report");
        let output = TallyError::from_anyhow(&err).to_string();
        assert!(output.contains("error: cannot write report"));
        assert!(output.contains("-> disk full"));
    }
}
