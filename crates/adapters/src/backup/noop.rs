// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op backup adapter for when backups are disabled.

use super::{BackupAdapter, BackupError, BackupKind, BackupReceipt, BackupStats};
use async_trait::async_trait;
use chrono::Utc;

#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpBackupAdapter;

impl NoOpBackupAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BackupAdapter for NoOpBackupAdapter {
    async fn backup(
        &self,
        kind: BackupKind,
        id: &str,
        _document: &serde_json::Value,
    ) -> Result<BackupReceipt, BackupError> {
        Ok(BackupReceipt {
            kind,
            id: id.to_string(),
            location: None,
            created_at: Utc::now(),
            bytes: 0,
        })
    }

    fn stats(&self) -> BackupStats {
        BackupStats::default()
    }
}
