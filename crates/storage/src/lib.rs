//! tally-storage: Durability and recovery for the tally ledger
//!
//! This crate provides:
//! - A write-ahead log with monotonic record ids
//! - Snapshot stores and the persistence strategies that drive them
//! - The in-memory account store
//! - Transaction bracketing and crash recovery
//! - The `Ledger` facade tying them together

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
pub mod ledger;
pub mod persistence;
pub mod recovery;
pub mod snapshot;
pub mod state;
pub mod transaction;
pub mod wal;

pub use error::StorageError;
pub use ledger::{Ledger, LedgerError};
pub use persistence::PersistenceStrategy;
pub use recovery::{RecoveryPlan, RecoveryReport};
pub use snapshot::{Accounts, FileSnapshotStore, MemorySnapshotStore, Snapshot, SnapshotStore};
pub use state::InMemoryStore;
pub use transaction::TransactionCoordinator;
pub use wal::WriteAheadLog;
