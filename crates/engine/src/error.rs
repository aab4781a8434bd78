// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised while bringing the coordinator up

use crate::config::ConfigError;
use thiserror::Error;
use wk_core::oplog::OpLogError;
use wk_storage::StoreError;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("operation log: {0}")]
    OpLog(#[from] OpLogError),
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
