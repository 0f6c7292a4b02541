// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bench command

use anyhow::{bail, Result};
use clap::Args;
use std::time::{Duration, Instant};
use tally_storage::Ledger;

#[derive(Args)]
pub struct BenchArgs {
    /// Operations timed per benchmark
    #[arg(long, default_value_t = 5000)]
    pub iterations: u32,

    /// Accounts the operations rotate through (at least 2)
    #[arg(long, default_value_t = 2)]
    pub accounts: usize,
}

/// Cumulative wall time of a repeated operation
#[derive(Debug)]
pub struct Benchmark {
    label: String,
    cumulative: Duration,
    iterations: u32,
}

impl Benchmark {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            cumulative: Duration::ZERO,
            iterations: 0,
        }
    }

    /// Run `f` once and add its duration to the total
    pub fn track<T>(&mut self, f: impl FnOnce() -> T) -> T {
        self.iterations += 1;
        let start = Instant::now();
        let out = f();
        self.cumulative += start.elapsed();
        out
    }

    pub fn report(&self) -> String {
        let secs = self.cumulative.as_secs_f64();
        let usec = secs * 1_000_000.0;
        let per_iteration = if self.iterations == 0 {
            0.0
        } else {
            usec / f64::from(self.iterations)
        };
        format!(
            "{}:\t{:.4} seconds ({:.0} usec) over {} iterations ({:.1} usec/iteration)",
            self.label, secs, usec, self.iterations, per_iteration
        )
    }
}

pub fn handle(ledger: &mut Ledger, args: &BenchArgs) -> Result<()> {
    if args.accounts < 2 {
        bail!("bench needs at least 2 accounts, got {}", args.accounts);
    }

    let names: Vec<String> = (0..args.accounts).map(|i| format!("bench-{}", i)).collect();
    for name in &names {
        ledger.open_account(name)?;
    }

    let mut deposit = Benchmark::new("deposit");
    let mut withdraw = Benchmark::new("withdraw");
    let mut transfer = Benchmark::new("transfer");

    for i in 0..args.iterations as usize {
        let name = &names[i % names.len()];
        deposit.track(|| ledger.deposit(name, 40))?;
    }
    for i in 0..args.iterations as usize {
        let name = &names[i % names.len()];
        withdraw.track(|| ledger.withdraw(name, 20))?;
    }
    for i in 0..args.iterations as usize {
        let from = &names[i % names.len()];
        let to = &names[(i + 1) % names.len()];
        transfer.track(|| ledger.transfer(from, to, 20))?;
    }

    for benchmark in [&deposit, &withdraw, &transfer] {
        println!("{}", benchmark.report());
    }
    Ok(())
}
