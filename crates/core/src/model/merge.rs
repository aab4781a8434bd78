// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Applying modifications to a world-state snapshot
//!
//! The world sub-maps (`regions`, `characters`, `relationships`, `economy`,
//! `environment`) are merged recursively: objects merge key by key, any
//! other value overwrites, and a `null` removes the key. `metadata` fields
//! overwrite one level deep. Every other top-level key overwrites wholesale.
//! Version, previous version, timestamp and checksum belong to the store and
//! are ignored here.

use super::state::WorldState;
use super::Document;
use serde_json::Value;

/// Top-level keys merged recursively
pub const DEEP_MERGE_KEYS: [&str; 5] = [
    "regions",
    "characters",
    "relationships",
    "economy",
    "environment",
];

const STORE_MANAGED_KEYS: [&str; 3] = ["version", "previousVersion", "timestamp"];

/// Produce a copy of `base` with `modifications` merged over it.
///
/// Fails when the merged document no longer describes a world state
/// (e.g. a region loses its `name`).
pub fn apply_modifications(
    base: &WorldState,
    modifications: &Document,
) -> Result<WorldState, serde_json::Error> {
    let mut merged = serde_json::to_value(base)?;

    if let Value::Object(target) = &mut merged {
        for (key, patch) in modifications {
            let key_str = key.as_str();
            if STORE_MANAGED_KEYS.contains(&key_str) {
                continue;
            }
            if DEEP_MERGE_KEYS.contains(&key_str) {
                let slot = target
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Document::new()));
                deep_merge(slot, patch);
            } else if key_str == "metadata" {
                merge_metadata(target, patch);
            } else {
                target.insert(key.clone(), patch.clone());
            }
        }
    }

    serde_json::from_value(merged)
}

/// Recursively merge `patch` into `target`
pub fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                if value.is_null() {
                    target.remove(key);
                    continue;
                }
                let slot = target.entry(key.clone()).or_insert(Value::Null);
                deep_merge(slot, value);
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

fn merge_metadata(target: &mut Document, patch: &Value) {
    let Value::Object(fields) = patch else {
        return;
    };
    let Some(Value::Object(metadata)) = target.get_mut("metadata") else {
        return;
    };
    for (key, value) in fields {
        if key != "checksum" {
            metadata.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
