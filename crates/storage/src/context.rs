// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collaborators shared by the three stores

use crate::files::JsonFiles;
use crate::ledger::MirrorLedger;
use std::sync::Arc;
use wk_adapters::{MirrorAdapter, MirrorError};
use wk_core::{BootstrapProvider, Clock, Layer, LogEntry, LogLevel, OperationLogger};

/// Everything a store needs besides its own state
#[derive(Clone)]
pub struct StoreContext<M, C> {
    pub files: JsonFiles,
    pub mirror: M,
    pub clock: C,
    pub logger: Arc<OperationLogger>,
    pub bootstrap: Arc<dyn BootstrapProvider>,
    pub ledger: Arc<MirrorLedger>,
}

impl<M: MirrorAdapter, C: Clock> StoreContext<M, C> {
    /// Copy `bytes` to the mirror. Never fails: a failed or disabled mirror
    /// is recorded as a pending write.
    pub async fn mirror_document(&self, layer: Layer, key: &str, bytes: &[u8]) -> Option<String> {
        match self.mirror.write(bytes).await {
            Ok(blob_ref) => {
                self.ledger.record_mirrored(layer, key, &blob_ref);
                Some(blob_ref)
            }
            Err(MirrorError::Disabled) => {
                self.ledger.record_pending(layer, key, None);
                None
            }
            Err(e) => {
                self.ledger.record_pending(layer, key, Some(e.to_string()));
                self.logger.record(
                    LogEntry::new(
                        self.clock.now(),
                        LogLevel::Warn,
                        layer,
                        "mirror",
                        format!("mirror write failed, {key} pending"),
                    )
                    .with_id(key),
                );
                None
            }
        }
    }

    /// Fetch a mirrored blob
    pub async fn read_mirrored(&self, blob_ref: &str) -> Result<Vec<u8>, MirrorError> {
        self.mirror.read(blob_ref).await
    }

    pub fn log(&self, entry: LogEntry) {
        self.logger.record(entry);
    }
}
