// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod action;
pub mod logs;
pub mod rules;
pub mod state;
pub mod system;

use crate::error::WkError;
use wk_engine::Envelope;

/// The envelope's data, or its error as a [`WkError`]
pub(crate) fn data<T>(operation: &str, envelope: Envelope<T>) -> anyhow::Result<Option<T>> {
    envelope
        .into_result()
        .map_err(|e| WkError::rejected(operation, &e).into())
}

/// Like [`data`], treating a missing value as an error
pub(crate) fn required<T>(operation: &str, envelope: Envelope<T>) -> anyhow::Result<T> {
    data(operation, envelope)?
        .ok_or_else(|| WkError::new(format!("{operation} returned nothing")).into())
}
