// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger configuration
//!
//! A ledger lives in a data directory. An optional `tally.toml` in that
//! directory overrides file locations and the snapshot persistence strategy:
//!
//! ```toml
//! wal_path = "tally.wal"
//! snapshot_path = "tally.snapshot"
//!
//! [persistence]
//! strategy = "buffered"
//! threshold = 5
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Mutations between snapshot dumps when buffering
pub const DEFAULT_THRESHOLD: usize = 5;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML syntax or schema error
    #[error("TOML syntax error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error reading file
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("buffered persistence threshold must be at least 1")]
    ZeroThreshold,
}

/// When in-memory state is flushed to the snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case", deny_unknown_fields)]
pub enum PersistenceConfig {
    /// Dump a snapshot after every mutation
    Immediate,
    /// Dump a snapshot after every `threshold` mutations
    Buffered {
        #[serde(default = "default_threshold")]
        threshold: usize,
    },
}

fn default_threshold() -> usize {
    DEFAULT_THRESHOLD
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        PersistenceConfig::Buffered {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Raw contents of `tally.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    wal_path: Option<PathBuf>,
    snapshot_path: Option<PathBuf>,
    persistence: Option<PersistenceConfig>,
}

/// Resolved configuration for one ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub wal_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub persistence: PersistenceConfig,
}

impl LedgerConfig {
    pub const FILE_NAME: &'static str = "tally.toml";
    pub const WAL_FILE: &'static str = "tally.wal";
    pub const SNAPSHOT_FILE: &'static str = "tally.snapshot";

    /// Default layout rooted at `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            wal_path: dir.join(Self::WAL_FILE),
            snapshot_path: dir.join(Self::SNAPSHOT_FILE),
            persistence: PersistenceConfig::default(),
        }
    }

    /// Load `tally.toml` from `dir` if present, otherwise use defaults
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(Self::FILE_NAME);
        if path.exists() {
            Self::from_file(dir, &path)
        } else {
            Ok(Self::in_dir(dir))
        }
    }

    /// Load configuration from an explicit file, resolving paths against `dir`
    pub fn from_file(dir: &Path, path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(dir, &content)
    }

    /// Parse configuration from TOML content, resolving paths against `dir`
    pub fn parse(dir: &Path, content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        let defaults = Self::in_dir(dir);
        let config = Self {
            wal_path: file
                .wal_path
                .map_or(defaults.wal_path, |p| dir.join(p)),
            snapshot_path: file
                .snapshot_path
                .map_or(defaults.snapshot_path, |p| dir.join(p)),
            persistence: file.persistence.unwrap_or(defaults.persistence),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the persistence strategy
    pub fn with_persistence(mut self, persistence: PersistenceConfig) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.persistence {
            PersistenceConfig::Buffered { threshold: 0 } => Err(ConfigError::ZeroThreshold),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
