// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON documents on disk, one file per record
//!
//! Writes go to a sibling temp file that is renamed over the target, so a
//! reader never observes a partially written record.

use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct JsonFiles {
    root: PathBuf,
}

impl JsonFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Raw bytes of a record, `None` when it does not exist
    pub async fn read_bytes(&self, rel: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(self.path_of(rel)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn read<T: DeserializeOwned>(&self, rel: &str) -> Result<Option<T>, StoreError> {
        match self.read_bytes(rel).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Atomically replace a record, returning the bytes written
    pub async fn write<T: Serialize>(&self, rel: &str, value: &T) -> Result<Vec<u8>, StoreError> {
        let path = self.path_of(rel);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(value)?;
        let tmp = tmp_path(&path);
        tokio::fs::write(&tmp, &bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(bytes)
    }

    /// Remove a record; `false` when it did not exist
    pub async fn remove(&self, rel: &str) -> Result<bool, StoreError> {
        match tokio::fs::remove_file(self.path_of(rel)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self, rel: &str) -> Result<bool, StoreError> {
        Ok(tokio::fs::try_exists(self.path_of(rel)).await?)
    }

    /// File stems of `*.json` records in a directory, in directory order
    pub async fn list_stems(&self, dir: &str) -> Result<Vec<String>, StoreError> {
        let mut entries = match tokio::fs::read_dir(self.path_of(dir)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut stems = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                if let Some(stem) = path.file_stem() {
                    stems.push(stem.to_string_lossy().to_string());
                }
            }
        }
        Ok(stems)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;
