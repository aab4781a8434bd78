// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration
//!
//! Read from `<data>/worldkeep.toml` when the file exists. Every key is
//! optional; missing keys take their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use wk_core::oplog::{
    LogFileConfig, LoggerConfig, DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_FILES,
    DEFAULT_MAX_FILE_BYTES,
};

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE: &str = "worldkeep.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("no data directory could be determined")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Root of every store, log and snapshot
    pub data_dir: PathBuf,
    pub logger: LoggerSection,
    pub mirror: MirrorSection,
    pub backup: BackupSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerSection {
    pub buffer_capacity: usize,
    /// Persist entries to `<data>/logs/operations.jsonl`
    pub file_enabled: bool,
    pub max_file_bytes: u64,
    pub max_files: usize,
}

impl Default for LoggerSection {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            file_enabled: true,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MirrorSection {
    pub enabled: bool,
    /// Blob directory; `<data>/mirror` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackupSection {
    pub enabled: bool,
    /// Backup directory; `<data>/backups` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for BackupSection {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_data_dir(PathBuf::new())
    }
}

impl EngineConfig {
    /// Defaults rooted at `data_dir`
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            logger: LoggerSection::default(),
            mirror: MirrorSection::default(),
            backup: BackupSection::default(),
        }
    }

    /// Load `<data_dir>/worldkeep.toml`, falling back to defaults when the
    /// file does not exist. A `data_dir` key in the file wins over the
    /// argument.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::for_data_dir(data_dir));
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        let mut config: EngineConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        if config.data_dir.as_os_str().is_empty() {
            config.data_dir = data_dir.to_path_buf();
        }
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn oplog_path(&self) -> PathBuf {
        self.logs_dir().join("operations.jsonl")
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }

    pub fn mirror_dir(&self) -> PathBuf {
        self.mirror
            .dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("mirror"))
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.backup
            .dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("backups"))
    }

    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            buffer_capacity: self.logger.buffer_capacity,
            file: self.logger.file_enabled.then(|| LogFileConfig {
                path: self.oplog_path(),
                max_bytes: self.logger.max_file_bytes,
                max_files: self.logger.max_files,
            }),
        }
    }
}

/// `$WK_DATA_DIR`, else the platform data directory plus `worldkeep`
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("WK_DATA_DIR") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::data_local_dir()
        .map(|dir| dir.join("worldkeep"))
        .ok_or(ConfigError::NoDataDir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
