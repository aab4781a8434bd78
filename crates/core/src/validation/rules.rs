// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{Findings, ValidationReport};
use crate::model::WorldRules;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Check a ruleset's version, sections and butterfly effects
pub fn validate_world_rules(rules: &WorldRules, now: DateTime<Utc>) -> ValidationReport {
    let mut findings = Findings::default();

    if !is_semver(&rules.version) {
        findings.error(
            "version",
            format!("must be a semantic version X.Y.Z, got '{}'", rules.version),
        );
    }

    for (field, section) in [
        ("rules.physics", &rules.rules.physics),
        ("rules.characterBehavior", &rules.rules.character_behavior),
        ("rules.actionConstraints", &rules.rules.action_constraints),
    ] {
        if section.is_empty() {
            findings.error(field, "is required");
        }
    }

    let mut seen = HashSet::new();
    for (i, effect) in rules.rules.butterfly_effects.iter().enumerate() {
        let at = format!("rules.butterflyEffects[{i}]");
        findings.require_text(&format!("{at}.id"), &effect.id);
        findings.require_text(&format!("{at}.trigger"), &effect.trigger);
        findings.require_text(&format!("{at}.description"), &effect.description);
        findings.require_unit_interval(&format!("{at}.probability"), effect.probability);

        if !effect.id.is_empty() && !seen.insert(effect.id.as_str()) {
            findings.error(format!("{at}.id"), format!("duplicate id '{}'", effect.id));
        }
        if effect.effects.is_empty() {
            findings.warn(format!("{at}.effects"), "has no effects");
        }
        for (j, change) in effect.effects.iter().enumerate() {
            findings.require_text(&format!("{at}.effects[{j}].type"), &change.kind);
            findings.require_text(&format!("{at}.effects[{j}].target"), &change.target);
        }
    }

    if rules.metadata.author.trim().is_empty() {
        findings.warn("metadata.author", "is empty");
    }
    if let Some(checksum) = &rules.metadata.checksum {
        if *checksum != rules.compute_checksum() {
            findings.warn("metadata.checksum", "is stale and will be recomputed on write");
        }
    }

    let checksum = rules.compute_checksum();
    findings.finish(rules, checksum, now)
}

/// `MAJOR.MINOR.PATCH` with plain decimal components
pub(crate) fn is_semver(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}
