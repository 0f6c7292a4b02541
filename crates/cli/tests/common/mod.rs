// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// Empty data directory, removed on drop
pub fn setup_test_env() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// `tally --dir <dir>` ready for more arguments
pub fn tally(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tally").expect("tally binary should build");
    cmd.arg("--dir").arg(dir).env_remove("RUST_LOG");
    cmd
}
