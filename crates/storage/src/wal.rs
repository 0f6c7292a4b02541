// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log for durable storage

use crate::StorageError;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tally_core::{Operation, Record, SequenceGenerator};
use tracing::{debug, warn};

/// Append-only log of ledger mutations and transaction markers.
///
/// Every append is synced before it returns, so a record that was handed an
/// id survives a crash.
pub struct WriteAheadLog {
    path: PathBuf,
    file: File,
    ids: SequenceGenerator,
}

impl WriteAheadLog {
    /// Open or create a WAL at the given path.
    ///
    /// A trailing fragment without a newline is left over from an append that
    /// was interrupted; it is truncated so the next record starts on a fresh
    /// line. Record numbering restarts at 1 until [`seed`](Self::seed) is
    /// called by recovery.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        let torn = torn_tail_len(&mut file)?;
        if torn > 0 {
            let len = file.metadata()?.len();
            warn!(
                path = %path.display(),
                bytes = torn,
                "discarding torn record at end of log"
            );
            file.set_len(len - torn)?;
            file.sync_all()?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
            ids: SequenceGenerator::new(),
        })
    }

    pub fn append_create(&mut self, key: &str, tx_id: Option<u64>) -> Result<u64, StorageError> {
        self.append(
            tx_id,
            Operation::Create {
                key: key.to_string(),
            },
        )
    }

    pub fn append_update(
        &mut self,
        key: &str,
        old_value: i64,
        new_value: i64,
        tx_id: Option<u64>,
    ) -> Result<u64, StorageError> {
        self.append(
            tx_id,
            Operation::Update {
                key: key.to_string(),
                old_value,
                new_value,
            },
        )
    }

    pub fn append_tx_start(&mut self, tx_id: u64) -> Result<u64, StorageError> {
        self.append(Some(tx_id), Operation::TxStart)
    }

    pub fn append_tx_commit(&mut self, tx_id: u64) -> Result<u64, StorageError> {
        self.append(Some(tx_id), Operation::TxCommit)
    }

    pub fn append_tx_rollback(&mut self, tx_id: u64) -> Result<u64, StorageError> {
        self.append(Some(tx_id), Operation::TxRollback)
    }

    /// Append a record and sync it to disk before returning its id
    fn append(&mut self, tx_id: Option<u64>, operation: Operation) -> Result<u64, StorageError> {
        let record = Record::new(self.ids.next()?, tx_id, operation);
        // Single write so a crash leaves at most one torn line
        let line = format!("{}\n", record);
        self.file.write_all(line.as_bytes())?;
        self.file.sync_all()?;
        debug!(record = %record, "appended");
        Ok(record.id)
    }

    /// Continue record numbering after `id`
    pub fn seed(&mut self, id: u64) {
        self.ids.seed(id);
    }

    /// Id of the last record appended by this process, or the seed
    pub fn last_id(&self) -> u64 {
        self.ids.current()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record from the start of the log, in order
    pub fn records(&self) -> Result<Vec<Record>, StorageError> {
        Self::read(&self.path)
    }

    /// Read every record from the log at `path`.
    ///
    /// A missing file is an empty log. An unterminated final line is treated
    /// as absent. Any other line that fails to decode, or whose id does not
    /// follow the previous one, is an error.
    pub fn read(path: &Path) -> Result<Vec<Record>, StorageError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records: Vec<Record> = Vec::new();
        for (idx, chunk) in bytes.split_inclusive(|b| *b == b'\n').enumerate() {
            let line_no = idx + 1;
            let Some(line) = chunk.strip_suffix(b"\n") else {
                warn!(path = %path.display(), line = line_no, "ignoring torn record");
                break;
            };
            let line = String::from_utf8_lossy(line);
            if line.trim().is_empty() {
                continue;
            }

            let record = line.parse::<Record>().map_err(|source| StorageError::CorruptRecord {
                path: path.display().to_string(),
                line: line_no,
                source,
            })?;
            if let Some(previous) = records.last() {
                if record.id <= previous.id {
                    return Err(StorageError::OutOfOrder {
                        path: path.display().to_string(),
                        line: line_no,
                        id: record.id,
                        previous: previous.id,
                    });
                }
            }
            records.push(record);
        }

        Ok(records)
    }
}

/// Number of bytes after the last newline in `file`
fn torn_tail_len(file: &mut File) -> io::Result<u64> {
    let len = file.metadata()?.len();
    let mut buf = [0u8; 4096];
    let mut end = len;

    while end > 0 {
        let start = end.saturating_sub(buf.len() as u64);
        let chunk = &mut buf[..(end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(chunk)?;
        if let Some(pos) = chunk.iter().rposition(|b| *b == b'\n') {
            return Ok(len - (start + pos as u64 + 1));
        }
        end = start;
    }

    Ok(len)
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
