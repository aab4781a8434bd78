// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake backup adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{BackupAdapter, BackupError, BackupKind, BackupReceipt, BackupStats, StatsCell};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Recorded backup call
#[derive(Debug, Clone, PartialEq)]
pub struct BackupCall {
    pub kind: BackupKind,
    pub id: String,
    pub document: serde_json::Value,
}

#[derive(Clone)]
pub struct FakeBackupAdapter {
    calls: Arc<Mutex<Vec<BackupCall>>>,
    failing: Arc<AtomicBool>,
    stats: StatsCell,
}

impl Default for FakeBackupAdapter {
    fn default() -> Self {
        Self {
            calls: Arc::default(),
            failing: Arc::default(),
            stats: StatsCell::enabled(),
        }
    }
}

impl FakeBackupAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<BackupCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl BackupAdapter for FakeBackupAdapter {
    async fn backup(
        &self,
        kind: BackupKind,
        id: &str,
        document: &serde_json::Value,
    ) -> Result<BackupReceipt, BackupError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(BackupCall {
                kind,
                id: id.to_string(),
                document: document.clone(),
            });

        if self.failing.load(Ordering::SeqCst) {
            let err = BackupError::Failed("fake backup failure".to_string());
            self.stats.failed(&err);
            return Err(err);
        }

        let receipt = BackupReceipt {
            kind,
            id: id.to_string(),
            location: Some(format!("fake://{kind}/{id}")),
            created_at: Utc::now(),
            bytes: document.to_string().len(),
        };
        self.stats.succeeded(&receipt);
        Ok(receipt)
    }

    fn stats(&self) -> BackupStats {
        self.stats.snapshot()
    }
}
