// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{Findings, ValidationReport};
use crate::model::WorldState;
use chrono::{DateTime, Utc};

/// Check a snapshot's versioning and the consistency of its entity maps.
///
/// A version of `0` is accepted: the store assigns one on write.
pub fn validate_world_state(state: &WorldState, now: DateTime<Utc>) -> ValidationReport {
    let mut findings = Findings::default();

    if let Some(previous) = state.previous_version {
        if state.version != 0 && previous >= state.version {
            findings.error(
                "previousVersion",
                format!(
                    "must be lower than version {}, got {previous}",
                    state.version
                ),
            );
        }
    }

    for (key, region) in &state.regions {
        let at = format!("regions.{key}");
        if region.id != *key {
            findings.error(
                format!("{at}.id"),
                format!("'{}' does not match its key", region.id),
            );
        }
        findings.require_text(&format!("{at}.name"), &region.name);
        findings.require_text(&format!("{at}.type"), &region.kind);
    }

    for (key, character) in &state.characters {
        let at = format!("characters.{key}");
        if character.id != *key {
            findings.error(
                format!("{at}.id"),
                format!("'{}' does not match its key", character.id),
            );
        }
        findings.require_text(&format!("{at}.name"), &character.name);
        if character.location.is_empty() {
            findings.warn(format!("{at}.location"), "is empty");
        } else if !state.regions.contains_key(&character.location) {
            findings.warn(
                format!("{at}.location"),
                format!("unknown region '{}'", character.location),
            );
        }
        if !character.attributes.health.is_finite() || character.attributes.health < 0.0 {
            findings.error(
                format!("{at}.attributes.health"),
                format!("must be non-negative, got {}", character.attributes.health),
            );
        }
    }

    if state.regions.is_empty() {
        findings.warn("regions", "world has no regions");
    }
    if state.timestamp > now {
        findings.warn("timestamp", "is in the future");
    }

    let checksum = state.compute_checksum();
    findings.finish(state, checksum, now)
}
