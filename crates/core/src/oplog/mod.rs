// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation logger
//!
//! Every store operation produces one [`LogEntry`]. Entries are kept in a
//! bounded in-memory ring buffer for querying, optionally appended to a
//! rotating JSONL file, and mirrored to `tracing`.

mod entry;
mod export;
mod file;
mod report;

pub use entry::{Layer, LogEntry, LogFilter, LogLevel};
pub use export::{to_csv, to_jsonl, ExportFormat, CSV_HEADER};
pub use file::{rotated_path, RotatingFile};
pub use report::{
    build_report, compute_performance, compute_stats, LogReport, LogStats, OperationMetrics,
    ERROR_RATE_THRESHOLD, SLOW_OPERATION_MS,
};

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

pub const DEFAULT_BUFFER_CAPACITY: usize = 1000;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_MAX_FILES: usize = 5;

#[derive(Debug, Error)]
pub enum OpLogError {
    #[error("log I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where and how the logger persists entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileConfig {
    pub path: PathBuf,
    pub max_bytes: u64,
    pub max_files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub buffer_capacity: usize,
    pub file: Option<LogFileConfig>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            file: None,
        }
    }
}

struct LoggerInner {
    buffer: VecDeque<LogEntry>,
    file: Option<RotatingFile>,
}

/// Shared structured log of store operations
pub struct OperationLogger {
    inner: Mutex<LoggerInner>,
    capacity: usize,
}

impl OperationLogger {
    /// Logger without a backing file
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LoggerInner {
                buffer: VecDeque::with_capacity(capacity.min(DEFAULT_BUFFER_CAPACITY)),
                file: None,
            }),
            capacity,
        }
    }

    /// Open the logger, reloading the tail of an existing log file into the buffer
    pub fn open(config: LoggerConfig) -> Result<Self, OpLogError> {
        let logger = Self::in_memory(config.buffer_capacity);
        if let Some(file_config) = config.file {
            let file = RotatingFile::open(
                file_config.path,
                file_config.max_bytes,
                file_config.max_files,
            )?;
            let tail = file.read_tail(config.buffer_capacity)?;
            let mut inner = logger.lock();
            inner.buffer.extend(tail);
            inner.file = Some(file);
        }
        Ok(logger)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LoggerInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        self.lock().file.as_ref().map(|f| f.path().to_path_buf())
    }

    /// Record an entry. File failures are reported through `tracing` only.
    pub fn record(&self, entry: LogEntry) {
        emit(&entry);

        let mut inner = self.lock();
        if let Some(file) = inner.file.as_mut() {
            if let Err(e) = file.append(&entry) {
                tracing::warn!(error = %e, path = %file.path().display(), "failed to append operation log");
            }
        }
        if self.capacity == 0 {
            return;
        }
        while inner.buffer.len() >= self.capacity {
            inner.buffer.pop_front();
        }
        inner.buffer.push_back(entry);
    }

    /// The newest `n` entries, oldest first
    pub fn recent(&self, n: usize) -> Vec<LogEntry> {
        let inner = self.lock();
        let skip = inner.buffer.len().saturating_sub(n);
        inner.buffer.iter().skip(skip).cloned().collect()
    }

    pub fn filter(&self, filter: &LogFilter) -> Vec<LogEntry> {
        self.lock()
            .buffer
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    /// Entries mentioning `text`, ignoring case
    pub fn search(&self, text: &str) -> Vec<LogEntry> {
        let needle = text.to_lowercase();
        self.lock()
            .buffer
            .iter()
            .filter(|e| e.mentions(&needle))
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> LogStats {
        compute_stats(self.lock().buffer.iter())
    }

    pub fn performance(&self) -> BTreeMap<String, OperationMetrics> {
        compute_performance(self.lock().buffer.iter())
    }

    pub fn report(&self, now: DateTime<Utc>) -> LogReport {
        let entries: Vec<LogEntry> = self.lock().buffer.iter().cloned().collect();
        build_report(&entries, self.capacity, now)
    }

    pub fn export(&self, format: ExportFormat) -> String {
        let inner = self.lock();
        match format {
            ExportFormat::Csv => to_csv(inner.buffer.iter()),
            ExportFormat::Jsonl => to_jsonl(inner.buffer.iter()),
        }
    }

    /// Write an export to `dir/oplog-<timestamp>.<ext>` and return its path
    pub fn export_to(
        &self,
        dir: &Path,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, OpLogError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!(
            "oplog-{}.{}",
            now.format("%Y%m%dT%H%M%S%.3fZ"),
            format.extension()
        ));
        std::fs::write(&path, self.export(format))?;
        Ok(path)
    }
}

fn emit(entry: &LogEntry) {
    let layer = entry.layer.as_str();
    let operation = entry.operation.as_str();
    let id = entry.id.as_deref().unwrap_or("");
    let duration_ms = entry.duration_ms;
    match entry.level {
        LogLevel::Debug => tracing::debug!(layer, operation, id, ?duration_ms, "{}", entry.message),
        LogLevel::Info => tracing::info!(layer, operation, id, ?duration_ms, "{}", entry.message),
        LogLevel::Warn => tracing::warn!(layer, operation, id, ?duration_ms, "{}", entry.message),
        LogLevel::Error => tracing::error!(
            layer,
            operation,
            id,
            ?duration_ms,
            error = entry.error.as_deref().unwrap_or(""),
            "{}",
            entry.message
        ),
    }
}

#[cfg(test)]
#[path = "oplog_tests.rs"]
mod tests;
