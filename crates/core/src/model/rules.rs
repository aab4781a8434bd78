// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! World rules: the singleton blueprint document

use super::Document;
use crate::checksum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The singleton ruleset governing world physics, behavior and butterfly effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldRules {
    /// Semantic version string (`X.Y.Z`)
    pub version: String,
    pub last_modified: DateTime<Utc>,
    pub rules: RuleSet,
    pub metadata: RulesMetadata,
}

/// The rule sections of a [`WorldRules`] document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    #[serde(default)]
    pub physics: Document,
    #[serde(default)]
    pub character_behavior: Document,
    #[serde(default)]
    pub action_constraints: Document,
    #[serde(default)]
    pub butterfly_effects: Vec<ButterflyEffect>,
}

/// A rule mapping a trigger keyword to a probabilistic set of effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButterflyEffect {
    pub id: String,
    /// Keyword matched against action intents
    pub trigger: String,
    pub description: String,
    /// Chance of firing, in `[0, 1]`
    pub probability: f64,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

/// A single change applied to a world-state target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub kind: String,
    pub target: String,
    #[serde(default)]
    pub change: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cascading: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesMetadata {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Fields covered by the rules checksum
#[derive(Serialize)]
struct RulesDigest<'a> {
    version: &'a str,
    rules: &'a RuleSet,
}

impl WorldRules {
    /// Digest over `{version, rules}`
    pub fn compute_checksum(&self) -> String {
        checksum::digest(&RulesDigest {
            version: &self.version,
            rules: &self.rules,
        })
    }

    /// Recompute and embed the checksum
    pub fn seal(&mut self) {
        self.metadata.checksum = Some(self.compute_checksum());
    }

    /// Butterfly effects whose trigger contains `keyword`, ignoring case
    pub fn butterfly_effects_matching(&self, keyword: &str) -> Vec<&ButterflyEffect> {
        let needle = keyword.to_lowercase();
        self.rules
            .butterfly_effects
            .iter()
            .filter(|effect| effect.trigger.to_lowercase().contains(&needle))
            .collect()
    }
}

impl ButterflyEffect {
    /// Whether this effect's trigger occurs in the given text, ignoring case
    pub fn is_triggered_by(&self, text: &str) -> bool {
        let trigger = self.trigger.trim().to_lowercase();
        !trigger.is_empty() && text.to_lowercase().contains(&trigger)
    }
}
