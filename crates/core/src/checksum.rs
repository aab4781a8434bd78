// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SHA-256 digests over canonical JSON
//!
//! Entities are digested over a fixed subset of their fields. The subset is
//! serialized with `serde_json`: struct fields keep declaration order and
//! maps (`BTreeMap`, `serde_json::Map`) serialize with sorted keys, so the
//! byte stream is stable across runs.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of raw bytes
pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Hex-encoded SHA-256 of the canonical JSON encoding of `value`
pub fn digest<T: Serialize + ?Sized>(value: &T) -> String {
    // Digest inputs are plain data (strings, numbers, string-keyed maps)
    // and always serialize.
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    digest_bytes(&bytes)
}

/// Whether `bytes` hash to `expected`
pub fn verify_bytes(bytes: &[u8], expected: &str) -> bool {
    digest_bytes(bytes) == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn digest_is_stable_hex() {
        let d = digest_bytes(b"worldkeep");
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(d, digest_bytes(b"worldkeep"));
    }

    #[test]
    fn map_key_order_does_not_change_digest() {
        let a = json!({"b": 1, "a": {"y": 2, "x": 3}});
        let b = json!({"a": {"x": 3, "y": 2}, "b": 1});
        assert_eq!(digest(&a), digest(&b));
    }

    #[test]
    fn different_values_have_different_digests() {
        assert_ne!(digest(&json!({"a": 1})), digest(&json!({"a": 2})));
    }

    #[test]
    fn verify_bytes_matches_digest() {
        let d = digest_bytes(b"payload");
        assert!(verify_bytes(b"payload", &d));
        assert!(!verify_bytes(b"payload!", &d));
    }
}
