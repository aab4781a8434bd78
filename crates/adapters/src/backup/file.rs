// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timestamped JSON file per backup
//!
//! Layout: `<root>/<kind>/<id>-<timestamp>.json`. Existing backups are never
//! overwritten or pruned.

use super::{BackupAdapter, BackupError, BackupKind, BackupReceipt, BackupStats, StatsCell};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use wk_core::{is_safe_record_id, Clock, SystemClock};

#[derive(Clone, Debug)]
pub struct FileBackupAdapter<C: Clock = SystemClock> {
    root: PathBuf,
    clock: C,
    stats: StatsCell,
}

impl FileBackupAdapter<SystemClock> {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_clock(root, SystemClock)
    }
}

impl<C: Clock> FileBackupAdapter<C> {
    pub fn with_clock(root: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            root: root.into(),
            clock,
            stats: StatsCell::enabled(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write_copy(
        &self,
        kind: BackupKind,
        id: &str,
        document: &serde_json::Value,
    ) -> Result<BackupReceipt, BackupError> {
        if !is_safe_record_id(id) {
            return Err(BackupError::InvalidId(id.to_string()));
        }
        let created_at = self.clock.now();
        let dir = self.root.join(kind.as_str());
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(format!(
            "{id}-{}.json",
            created_at.format("%Y%m%dT%H%M%S%.3fZ")
        ));
        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        Ok(BackupReceipt {
            kind,
            id: id.to_string(),
            location: Some(path.display().to_string()),
            created_at,
            bytes: bytes.len(),
        })
    }
}

#[async_trait]
impl<C: Clock> BackupAdapter for FileBackupAdapter<C> {
    async fn backup(
        &self,
        kind: BackupKind,
        id: &str,
        document: &serde_json::Value,
    ) -> Result<BackupReceipt, BackupError> {
        let result = self.write_copy(kind, id, document).await;
        match &result {
            Ok(receipt) => self.stats.succeeded(receipt),
            Err(e) => self.stats.failed(e),
        }
        result
    }

    fn stats(&self) -> BackupStats {
        self.stats.snapshot()
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
