// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tally - durable ledger CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod error;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use commands::{account, bench, log, peek};
use std::path::PathBuf;
use std::process::ExitCode;
use tally_core::{LedgerConfig, PersistenceConfig};
use tally_storage::Ledger;
use tracing::debug;

use crate::error::TallyError;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Tally - a durable ledger backed by a write-ahead log"
)]
struct Cli {
    /// Data directory holding the log, snapshot and tally.toml
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Configuration file (defaults to <dir>/tally.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Snapshot persistence strategy
    #[arg(long, global = true, value_enum)]
    strategy: Option<Strategy>,

    /// Mutations between snapshots for the buffered strategy
    #[arg(long, global = true)]
    threshold: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    Immediate,
    Buffered,
}

#[derive(Subcommand)]
enum Commands {
    /// Open an account with a zero balance
    Open { name: String },
    /// Show an account's balance
    Inquire { name: String },
    /// Add to an account's balance
    Deposit { name: String, amount: i64 },
    /// Subtract from an account's balance
    Withdraw { name: String, amount: i64 },
    /// Move an amount between accounts in one transaction
    Transfer { from: String, to: String, amount: i64 },
    /// Show every account
    Peek(peek::PeekArgs),
    /// Print the write-ahead log
    Log(log::LogArgs),
    /// Time ledger operations
    Bench(bench::BenchArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", TallyError::from_anyhow(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    // Reading the log needs no recovery
    if let Commands::Log(args) = &cli.command {
        return log::handle(args, &config);
    }

    let mut ledger = Ledger::open(&config)?;

    match cli.command {
        Commands::Open { name } => account::open(&mut ledger, &name),
        Commands::Inquire { name } => account::inquire(&ledger, &name),
        Commands::Deposit { name, amount } => account::deposit(&mut ledger, &name, amount),
        Commands::Withdraw { name, amount } => account::withdraw(&mut ledger, &name, amount),
        Commands::Transfer { from, to, amount } => {
            account::transfer(&mut ledger, &from, &to, amount)
        }
        Commands::Peek(args) => peek::handle(&ledger, &args),
        Commands::Bench(args) => bench::handle(&mut ledger, &args),
        Commands::Log(_) => Ok(()),
    }
}

/// Resolve configuration from the data directory and command-line overrides
fn load_config(cli: &Cli) -> Result<LedgerConfig> {
    let dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    let config = match &cli.config {
        Some(path) => LedgerConfig::from_file(&dir, path)?,
        None => LedgerConfig::load(&dir)?,
    };

    let persistence = match (cli.strategy, cli.threshold) {
        (Some(Strategy::Immediate), _) => PersistenceConfig::Immediate,
        (Some(Strategy::Buffered), Some(threshold)) | (None, Some(threshold)) => {
            PersistenceConfig::Buffered { threshold }
        }
        (Some(Strategy::Buffered), None) => match config.persistence {
            buffered @ PersistenceConfig::Buffered { .. } => buffered,
            PersistenceConfig::Immediate => PersistenceConfig::default(),
        },
        (None, None) => config.persistence,
    };

    let config = config.with_persistence(persistence);
    config.validate()?;
    debug!(
        wal = %config.wal_path.display(),
        snapshot = %config.snapshot_path.display(),
        persistence = ?config.persistence,
        "resolved config"
    );
    Ok(config)
}

/// Log to stderr, filtered by RUST_LOG (default: warn)
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
