// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Peek command

use crate::output::{print_list, OutputFormat};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::fmt;
use tally_storage::Ledger;

#[derive(Args)]
pub struct PeekArgs {
    /// Print accounts as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct AccountInfo {
    name: String,
    balance: i64,
}

impl fmt::Display for AccountInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.balance)
    }
}

pub fn handle(ledger: &Ledger, args: &PeekArgs) -> Result<()> {
    let accounts: Vec<AccountInfo> = ledger
        .peek()
        .iter()
        .map(|(name, balance)| AccountInfo {
            name: name.clone(),
            balance: *balance,
        })
        .collect();

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    if accounts.is_empty() && !args.json {
        println!("No accounts");
        return Ok(());
    }

    print_list(&accounts, format);
    Ok(())
}
