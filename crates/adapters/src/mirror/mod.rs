// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content-addressed blob mirrors
//!
//! A mirror keeps a secondary copy of written documents outside the primary
//! store. Mirror failures never fail a primary write; callers record them
//! as "pending" and carry on.

mod local;
mod noop;

pub use local::LocalBlobMirror;
pub use noop::NoOpMirrorAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMirrorAdapter, MirrorCall};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("mirror disabled")]
    Disabled,
    #[error("mirror unavailable: {0}")]
    Unavailable(String),
    #[error("blob not found: {0}")]
    NotFound(String),
    #[error("invalid blob ref: {0}")]
    InvalidRef(String),
    #[error("blob {blob_ref} is corrupted (content hashes to {actual})")]
    Corrupted { blob_ref: String, actual: String },
    #[error("mirror I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorStatus {
    Healthy,
    Degraded,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorHealth {
    pub status: MirrorStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl MirrorHealth {
    pub fn healthy() -> Self {
        Self {
            status: MirrorStatus::Healthy,
            detail: None,
        }
    }

    pub fn degraded(detail: impl Into<String>) -> Self {
        Self {
            status: MirrorStatus::Degraded,
            detail: Some(detail.into()),
        }
    }

    pub fn disabled() -> Self {
        Self {
            status: MirrorStatus::Disabled,
            detail: None,
        }
    }
}

/// Adapter for the external blob network
#[async_trait]
pub trait MirrorAdapter: Clone + Send + Sync + 'static {
    /// Store a blob, returning its reference
    async fn write(&self, bytes: &[u8]) -> Result<String, MirrorError>;

    /// Fetch a blob by reference
    async fn read(&self, blob_ref: &str) -> Result<Vec<u8>, MirrorError>;

    async fn health(&self) -> MirrorHealth;
}
