// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log command

use anyhow::Result;
use clap::Args;
use tally_core::LedgerConfig;
use tally_storage::WriteAheadLog;

#[derive(Args)]
pub struct LogArgs {
    /// Only show records with an id greater than this
    #[arg(long)]
    pub after: Option<u64>,
}

/// Print committed log lines without running recovery
pub fn handle(args: &LogArgs, config: &LedgerConfig) -> Result<()> {
    let after = args.after.unwrap_or(0);
    for record in WriteAheadLog::read(&config.wal_path)?
        .iter()
        .filter(|r| r.id > after)
    {
        println!("{}", record);
    }
    Ok(())
}
