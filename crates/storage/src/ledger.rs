// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bookkeeping of mirror writes per store
//!
//! A primary write whose mirror copy failed (or was skipped because the
//! mirror is disabled) is counted as pending; the most recent error is kept.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use wk_core::Layer;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorCounters {
    pub mirrored: u64,
    pub pending: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct LedgerInner {
    counters: BTreeMap<Layer, MirrorCounters>,
    refs: HashMap<(Layer, String), String>,
}

#[derive(Debug, Default)]
pub struct MirrorLedger {
    inner: Mutex<LedgerInner>,
}

impl MirrorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LedgerInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record_mirrored(&self, layer: Layer, key: &str, blob_ref: &str) {
        let mut inner = self.lock();
        let counters = inner.counters.entry(layer).or_default();
        counters.mirrored += 1;
        counters.last_ref = Some(blob_ref.to_string());
        inner
            .refs
            .insert((layer, key.to_string()), blob_ref.to_string());
    }

    /// `error` is `None` when the mirror is disabled
    pub fn record_pending(&self, layer: Layer, key: &str, error: Option<String>) {
        let mut inner = self.lock();
        let counters = inner.counters.entry(layer).or_default();
        counters.pending += 1;
        if error.is_some() {
            counters.last_error = error;
        }
        inner.refs.remove(&(layer, key.to_string()));
    }

    /// Blob reference of the last mirrored copy of a record
    pub fn blob_ref(&self, layer: Layer, key: &str) -> Option<String> {
        self.lock().refs.get(&(layer, key.to_string())).cloned()
    }

    pub fn counters(&self, layer: Layer) -> MirrorCounters {
        self.lock().counters.get(&layer).cloned().unwrap_or_default()
    }

    /// Counters of every layer that has seen a write, keyed by layer name
    pub fn snapshot(&self) -> BTreeMap<String, MirrorCounters> {
        self.lock()
            .counters
            .iter()
            .map(|(layer, c)| (layer.to_string(), c.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_mirrored_and_pending_per_layer() {
        let ledger = MirrorLedger::new();
        ledger.record_mirrored(Layer::State, "v1", "ref-1");
        ledger.record_mirrored(Layer::State, "v2", "ref-2");
        ledger.record_pending(Layer::Blueprint, "world-rules", Some("offline".to_string()));
        ledger.record_pending(Layer::Blueprint, "world-rules", None);

        let state = ledger.counters(Layer::State);
        assert_eq!((state.mirrored, state.pending), (2, 0));
        assert_eq!(state.last_ref.as_deref(), Some("ref-2"));

        let blueprint = ledger.counters(Layer::Blueprint);
        assert_eq!((blueprint.mirrored, blueprint.pending), (0, 2));
        assert_eq!(blueprint.last_error.as_deref(), Some("offline"));

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["blueprint", "state"]);
    }

    #[test]
    fn pending_write_forgets_previous_ref() {
        let ledger = MirrorLedger::new();
        ledger.record_mirrored(Layer::Blueprint, "world-rules", "ref-1");
        assert_eq!(
            ledger.blob_ref(Layer::Blueprint, "world-rules").as_deref(),
            Some("ref-1")
        );
        ledger.record_pending(Layer::Blueprint, "world-rules", None);
        assert!(ledger.blob_ref(Layer::Blueprint, "world-rules").is_none());
    }
}
