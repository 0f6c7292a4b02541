// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration modules

mod ledger;

pub use ledger::{ConfigError, LedgerConfig, PersistenceConfig, DEFAULT_THRESHOLD};
