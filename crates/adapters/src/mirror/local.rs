// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory-backed blob mirror
//!
//! Blobs live at `<root>/<first two hex chars>/<sha256 hex>`; the reference
//! of a blob is its SHA-256 hex digest, so identical content is stored once.

use super::{MirrorAdapter, MirrorError, MirrorHealth};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use wk_core::checksum;

#[derive(Clone, Debug)]
pub struct LocalBlobMirror {
    root: PathBuf,
}

impl LocalBlobMirror {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, blob_ref: &str) -> Result<PathBuf, MirrorError> {
        if blob_ref.len() != 64 || !blob_ref.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(MirrorError::InvalidRef(blob_ref.to_string()));
        }
        Ok(self.root.join(&blob_ref[..2]).join(blob_ref))
    }
}

#[async_trait]
impl MirrorAdapter for LocalBlobMirror {
    async fn write(&self, bytes: &[u8]) -> Result<String, MirrorError> {
        let blob_ref = checksum::digest_bytes(bytes);
        let path = self.blob_path(&blob_ref)?;
        if tokio::fs::try_exists(&path).await? {
            return Ok(blob_ref);
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(blob_ref)
    }

    async fn read(&self, blob_ref: &str) -> Result<Vec<u8>, MirrorError> {
        let path = self.blob_path(blob_ref)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MirrorError::NotFound(blob_ref.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        if !checksum::verify_bytes(&bytes, blob_ref) {
            return Err(MirrorError::Corrupted {
                blob_ref: blob_ref.to_string(),
                actual: checksum::digest_bytes(&bytes),
            });
        }
        Ok(bytes)
    }

    async fn health(&self) -> MirrorHealth {
        if let Err(e) = tokio::fs::create_dir_all(&self.root).await {
            return MirrorHealth::degraded(format!(
                "cannot create {}: {e}",
                self.root.display()
            ));
        }
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.permissions().readonly() => {
                MirrorHealth::degraded(format!("{} is read-only", self.root.display()))
            }
            Ok(_) => MirrorHealth::healthy(),
            Err(e) => MirrorHealth::degraded(e.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
