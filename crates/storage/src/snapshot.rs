// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot storage
//!
//! A snapshot is the full account map plus the id of the last log record it
//! reflects. The file form is the id on the first line followed by one
//! `<key>:<balance>` line per account.

use crate::StorageError;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Account name to balance
pub type Accounts = BTreeMap<String, i64>;

/// A point-in-time view of the accounts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub state: Accounts,
    /// Every record up to and including this id is reflected in `state`
    pub last_log_id: u64,
}

/// Durable home for snapshots
pub trait SnapshotStore {
    /// Load the latest snapshot, or an empty one if none was written yet
    fn load(&self) -> Result<Snapshot, StorageError>;

    /// Replace the stored snapshot
    fn dump(&mut self, state: &Accounts, last_log_id: u64) -> Result<(), StorageError>;
}

/// Snapshot kept in a single text file
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());
        self.path.with_file_name(format!("{}.tmp", name))
    }

    fn corrupt(&self, line: usize, reason: impl Into<String>) -> StorageError {
        StorageError::CorruptSnapshot {
            path: self.path.display().to_string(),
            line,
            reason: reason.into(),
        }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Snapshot, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Snapshot::default()),
            Err(e) => return Err(e.into()),
        };

        let mut lines = content.lines().enumerate();
        let last_log_id: u64 = match lines.next() {
            None => return Ok(Snapshot::default()),
            Some((_, header)) if header.trim().is_empty() => 0,
            Some((_, header)) => header
                .trim()
                .parse()
                .map_err(|_| self.corrupt(1, format!("invalid log id {:?}", header)))?,
        };

        let mut state = Accounts::new();
        for (idx, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let (key, balance) = line
                .rsplit_once(':')
                .ok_or_else(|| self.corrupt(idx + 1, format!("expected key:balance, got {:?}", line)))?;
            let balance: i64 = balance
                .trim()
                .parse()
                .map_err(|_| self.corrupt(idx + 1, format!("invalid balance {:?}", balance)))?;
            state.insert(key.to_string(), balance);
        }

        Ok(Snapshot { state, last_log_id })
    }

    /// Write to a sibling temp file and rename it into place, so a crash
    /// mid-dump leaves the previous snapshot intact.
    fn dump(&mut self, state: &Accounts, last_log_id: u64) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        {
            let mut writer = BufWriter::new(File::create(&temp)?);
            writeln!(writer, "{}", last_log_id)?;
            for (key, balance) in state {
                writeln!(writer, "{}:{}", key, balance)?;
            }
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;

        debug!(
            path = %self.path.display(),
            last_log_id,
            accounts = state.len(),
            "snapshot written"
        );
        Ok(())
    }
}

/// In-memory snapshot store.
///
/// Clones share the same snapshot, so a test can hand one clone to a ledger
/// and inspect dumps through another.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    snapshot: Snapshot,
    dumps: usize,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `snapshot`
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryInner { snapshot, dumps: 0 })),
        }
    }

    /// The last snapshot dumped
    pub fn snapshot(&self) -> Snapshot {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .snapshot
            .clone()
    }

    /// Number of dumps performed
    pub fn dumps(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).dumps
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Snapshot, StorageError> {
        Ok(self.snapshot())
    }

    fn dump(&mut self, state: &Accounts, last_log_id: u64) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.snapshot = Snapshot {
            state: state.clone(),
            last_log_id,
        };
        inner.dumps += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
