// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::backup::{BackupAdapter, BackupError, BackupKind, BackupReceipt, BackupStats};
use crate::mirror::{MirrorAdapter, MirrorError, MirrorHealth, MirrorStatus};
use async_trait::async_trait;

/// Wrapper that adds tracing to any MirrorAdapter
#[derive(Clone)]
pub struct TracedMirrorAdapter<M> {
    inner: M,
}

impl<M> TracedMirrorAdapter<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

#[async_trait]
impl<M: MirrorAdapter> MirrorAdapter for TracedMirrorAdapter<M> {
    async fn write(&self, bytes: &[u8]) -> Result<String, MirrorError> {
        let span = tracing::info_span!("mirror.write", len = bytes.len());
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.write(bytes).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(blob_ref) => tracing::info!(
                blob_ref = blob_ref.as_str(),
                elapsed_ms = elapsed.as_millis() as u64,
                "blob mirrored"
            ),
            Err(MirrorError::Disabled) => tracing::debug!("mirror disabled, write pending"),
            Err(e) => tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "mirror write failed, write pending"
            ),
        }

        result
    }

    async fn read(&self, blob_ref: &str) -> Result<Vec<u8>, MirrorError> {
        let span = tracing::info_span!("mirror.read", blob_ref);
        let _guard = span.enter();

        let result = self.inner.read(blob_ref).await;
        match &result {
            Ok(bytes) => tracing::debug!(len = bytes.len(), "blob read"),
            Err(e) => tracing::error!(error = %e, "mirror read failed"),
        }

        result
    }

    async fn health(&self) -> MirrorHealth {
        let health = self.inner.health().await;
        if health.status == MirrorStatus::Degraded {
            tracing::warn!(detail = ?health.detail, "mirror degraded");
        } else {
            tracing::trace!(status = ?health.status, "mirror health");
        }
        health
    }
}

/// Wrapper that adds tracing to any BackupAdapter
#[derive(Clone)]
pub struct TracedBackupAdapter<B> {
    inner: B,
}

impl<B> TracedBackupAdapter<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: BackupAdapter> BackupAdapter for TracedBackupAdapter<B> {
    async fn backup(
        &self,
        kind: BackupKind,
        id: &str,
        document: &serde_json::Value,
    ) -> Result<BackupReceipt, BackupError> {
        let span = tracing::info_span!("backup.write", kind = kind.as_str(), id);
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.backup(kind, id, document).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(receipt) => tracing::info!(
                location = receipt.location.as_deref().unwrap_or("none"),
                bytes = receipt.bytes,
                elapsed_ms = elapsed.as_millis() as u64,
                "backup written"
            ),
            Err(e) => tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "backup failed"
            ),
        }

        result
    }

    fn stats(&self) -> BackupStats {
        self.inner.stats()
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
