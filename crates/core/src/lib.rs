//! tally-core: Core types for the tally durable ledger
//!
//! This crate provides:
//! - Sequence generators for record and transaction ids
//! - Write-ahead log records and their line encoding
//! - Transaction status tracking
//! - Ledger configuration

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod id;
pub mod record;
pub mod transaction;

// Re-exports
pub use config::{ConfigError, LedgerConfig, PersistenceConfig};
pub use id::{IdsExhausted, SequenceGenerator};
pub use record::{is_valid_key, Operation, Record, RecordParseError};
pub use transaction::TxStatus;
