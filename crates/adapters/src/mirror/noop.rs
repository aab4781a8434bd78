// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op mirror for when replication is disabled.

use super::{MirrorAdapter, MirrorError, MirrorHealth};
use async_trait::async_trait;

/// Mirror that stores nothing.
///
/// Every write reports [`MirrorError::Disabled`], which callers count as a
/// pending mirror write.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpMirrorAdapter;

impl NoOpMirrorAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MirrorAdapter for NoOpMirrorAdapter {
    async fn write(&self, _bytes: &[u8]) -> Result<String, MirrorError> {
        Err(MirrorError::Disabled)
    }

    async fn read(&self, _blob_ref: &str) -> Result<Vec<u8>, MirrorError> {
        Err(MirrorError::Disabled)
    }

    async fn health(&self) -> MirrorHealth {
        MirrorHealth::disabled()
    }
}
