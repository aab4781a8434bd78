// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use wk_core::ValidationErrors;

/// Errors from the three stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("integrity check failed for {kind} '{id}': expected checksum {expected}, computed {actual}")]
    Integrity {
        kind: &'static str,
        id: String,
        expected: String,
        actual: String,
    },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether the error signals a corrupted or tampered record
    pub fn is_corruption(&self) -> bool {
        matches!(self, StoreError::Integrity { .. } | StoreError::Json(_))
    }
}
