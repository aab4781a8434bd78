// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete adapters selected by [`EngineConfig`]

use crate::config::EngineConfig;
use crate::coordinator::{CoordinatorDeps, StorageCoordinator};
use crate::error::CoordinatorError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use wk_adapters::{
    BackupAdapter, BackupError, BackupKind, BackupReceipt, BackupStats, FileBackupAdapter,
    LocalBlobMirror, MirrorAdapter, MirrorError, MirrorHealth, NoOpBackupAdapter,
    NoOpMirrorAdapter, TracedBackupAdapter, TracedMirrorAdapter,
};
use wk_core::{BuiltinBootstrap, OperationLogger, SystemClock, UuidIdGen};

/// Coordinator with the adapters a configuration selects, wrapped with tracing
pub type WorldCoordinator = StorageCoordinator<
    TracedMirrorAdapter<ConfiguredMirror>,
    TracedBackupAdapter<ConfiguredBackup>,
    SystemClock,
    UuidIdGen,
>;

#[derive(Clone)]
pub enum ConfiguredMirror {
    Disabled(NoOpMirrorAdapter),
    Local(LocalBlobMirror),
}

impl ConfiguredMirror {
    pub fn from_config(config: &EngineConfig) -> Self {
        if config.mirror.enabled {
            ConfiguredMirror::Local(LocalBlobMirror::new(config.mirror_dir()))
        } else {
            ConfiguredMirror::Disabled(NoOpMirrorAdapter::new())
        }
    }
}

#[async_trait]
impl MirrorAdapter for ConfiguredMirror {
    async fn write(&self, bytes: &[u8]) -> Result<String, MirrorError> {
        match self {
            ConfiguredMirror::Disabled(m) => m.write(bytes).await,
            ConfiguredMirror::Local(m) => m.write(bytes).await,
        }
    }

    async fn read(&self, blob_ref: &str) -> Result<Vec<u8>, MirrorError> {
        match self {
            ConfiguredMirror::Disabled(m) => m.read(blob_ref).await,
            ConfiguredMirror::Local(m) => m.read(blob_ref).await,
        }
    }

    async fn health(&self) -> MirrorHealth {
        match self {
            ConfiguredMirror::Disabled(m) => m.health().await,
            ConfiguredMirror::Local(m) => m.health().await,
        }
    }
}

#[derive(Clone)]
pub enum ConfiguredBackup {
    Disabled(NoOpBackupAdapter),
    File(FileBackupAdapter),
}

impl ConfiguredBackup {
    pub fn from_config(config: &EngineConfig) -> Self {
        if config.backup.enabled {
            ConfiguredBackup::File(FileBackupAdapter::new(config.backup_dir()))
        } else {
            ConfiguredBackup::Disabled(NoOpBackupAdapter::new())
        }
    }
}

#[async_trait]
impl BackupAdapter for ConfiguredBackup {
    async fn backup(
        &self,
        kind: BackupKind,
        id: &str,
        document: &Value,
    ) -> Result<BackupReceipt, BackupError> {
        match self {
            ConfiguredBackup::Disabled(b) => b.backup(kind, id, document).await,
            ConfiguredBackup::File(b) => b.backup(kind, id, document).await,
        }
    }

    fn stats(&self) -> BackupStats {
        match self {
            ConfiguredBackup::Disabled(b) => b.stats(),
            ConfiguredBackup::File(b) => b.stats(),
        }
    }
}

/// Open a coordinator over `config` with production adapters
pub async fn open_configured(config: EngineConfig) -> Result<WorldCoordinator, CoordinatorError> {
    let logger = OperationLogger::open(config.logger_config())?;
    let deps = CoordinatorDeps {
        mirror: TracedMirrorAdapter::new(ConfiguredMirror::from_config(&config)),
        backup: TracedBackupAdapter::new(ConfiguredBackup::from_config(&config)),
        clock: SystemClock,
        ids: UuidIdGen,
        bootstrap: Arc::new(BuiltinBootstrap),
        logger: Arc::new(logger),
    };
    StorageCoordinator::open(config, deps).await
}
