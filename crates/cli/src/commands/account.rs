// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Account commands

use anyhow::Result;
use tally_storage::{Ledger, LedgerError};

pub fn open(ledger: &mut Ledger, name: &str) -> Result<()> {
    ledger.open_account(name)?;
    println!("Opened account '{}'", name);
    Ok(())
}

pub fn inquire(ledger: &Ledger, name: &str) -> Result<()> {
    let balance = ledger
        .inquire(name)
        .ok_or_else(|| LedgerError::UnknownAccount(name.to_string()))?;
    println!("{}", balance);
    Ok(())
}

pub fn deposit(ledger: &mut Ledger, name: &str, amount: i64) -> Result<()> {
    let balance = ledger.deposit(name, amount)?;
    println!("{}: {}", name, balance);
    Ok(())
}

pub fn withdraw(ledger: &mut Ledger, name: &str, amount: i64) -> Result<()> {
    let balance = ledger.withdraw(name, amount)?;
    println!("{}: {}", name, balance);
    Ok(())
}

pub fn transfer(ledger: &mut Ledger, from: &str, to: &str, amount: i64) -> Result<()> {
    ledger.transfer(from, to, amount)?;
    for name in [from, to] {
        if let Some(balance) = ledger.inquire(name) {
            println!("{}: {}", name, balance);
        }
    }
    Ok(())
}
