// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-in-time backups of freshly written documents
//!
//! Backups are best-effort side effects of a successful primary write.
//! Reads never depend on them.

mod file;
mod noop;

pub use file::FileBackupAdapter;
pub use noop::NoOpBackupAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{BackupCall, FakeBackupAdapter};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors from backup operations
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("invalid backup id: {0}")]
    InvalidId(String),
    #[error("backup failed: {0}")]
    Failed(String),
    #[error("backup I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("backup serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which store a backed-up document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupKind {
    Rules,
    Action,
    State,
}

impl BackupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupKind::Rules => "rules",
            BackupKind::Action => "action",
            BackupKind::State => "state",
        }
    }
}

impl fmt::Display for BackupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupReceipt {
    pub kind: BackupKind,
    pub id: String,
    /// Where the copy was written; `None` when backups are disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub bytes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupStats {
    pub enabled: bool,
    pub completed: u64,
    pub failed: u64,
    pub by_kind: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_backup_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Adapter for the backup collaborator
#[async_trait]
pub trait BackupAdapter: Clone + Send + Sync + 'static {
    /// Copy `document` somewhere independent of the primary store
    async fn backup(
        &self,
        kind: BackupKind,
        id: &str,
        document: &serde_json::Value,
    ) -> Result<BackupReceipt, BackupError>;

    fn stats(&self) -> BackupStats;
}

/// Shared success/failure counters for backup adapters
#[derive(Clone, Debug, Default)]
pub(crate) struct StatsCell {
    inner: Arc<Mutex<BackupStats>>,
}

impl StatsCell {
    pub(crate) fn enabled() -> Self {
        let cell = Self::default();
        cell.lock().enabled = true;
        cell
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BackupStats> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn succeeded(&self, receipt: &BackupReceipt) {
        let mut stats = self.lock();
        stats.completed += 1;
        *stats
            .by_kind
            .entry(receipt.kind.as_str().to_string())
            .or_default() += 1;
        stats.last_backup_at = Some(receipt.created_at);
    }

    pub(crate) fn failed(&self, error: &BackupError) {
        let mut stats = self.lock();
        stats.failed += 1;
        stats.last_error = Some(error.to_string());
    }

    pub(crate) fn snapshot(&self) -> BackupStats {
        self.lock().clone()
    }
}
