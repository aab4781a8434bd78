// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake mirror adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{MirrorAdapter, MirrorError, MirrorHealth};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use wk_core::checksum;

/// Recorded mirror call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorCall {
    Write { len: usize },
    Read { blob_ref: String },
    Health,
}

/// In-memory mirror that can be switched into failure mode
#[derive(Clone, Default)]
pub struct FakeMirrorAdapter {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    calls: Arc<Mutex<Vec<MirrorCall>>>,
    failing: Arc<AtomicBool>,
}

impl FakeMirrorAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<MirrorCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn record(&self, call: MirrorCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn is_failing(&self) -> bool {
        self.failing.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MirrorAdapter for FakeMirrorAdapter {
    async fn write(&self, bytes: &[u8]) -> Result<String, MirrorError> {
        self.record(MirrorCall::Write { len: bytes.len() });
        if self.is_failing() {
            return Err(MirrorError::Unavailable("fake mirror failure".to_string()));
        }
        let blob_ref = checksum::digest_bytes(bytes);
        self.blobs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(blob_ref.clone(), bytes.to_vec());
        Ok(blob_ref)
    }

    async fn read(&self, blob_ref: &str) -> Result<Vec<u8>, MirrorError> {
        self.record(MirrorCall::Read {
            blob_ref: blob_ref.to_string(),
        });
        if self.is_failing() {
            return Err(MirrorError::Unavailable("fake mirror failure".to_string()));
        }
        self.blobs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(blob_ref)
            .cloned()
            .ok_or_else(|| MirrorError::NotFound(blob_ref.to_string()))
    }

    async fn health(&self) -> MirrorHealth {
        self.record(MirrorCall::Health);
        if self.is_failing() {
            MirrorHealth::degraded("fake mirror failure")
        } else {
            MirrorHealth::healthy()
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
