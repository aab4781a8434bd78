// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned world-state snapshots

use super::Document;
use crate::checksum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One immutable point-in-time copy of the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldState {
    /// Snapshot version; `0` means "let the store assign one"
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<u64>,
    pub timestamp: DateTime<Utc>,
    pub regions: BTreeMap<String, Region>,
    pub characters: BTreeMap<String, Character>,
    #[serde(default)]
    pub relationships: Document,
    #[serde(default)]
    pub economy: Document,
    #[serde(default)]
    pub environment: Document,
    pub metadata: StateMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMetadata {
    #[serde(default)]
    pub checksum: String,
    /// Number of completed actions folded into this snapshot
    pub action_count: u64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub economy: Document,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub properties: Document,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Id of the region the character is in
    pub location: String,
    pub status: String,
    #[serde(default)]
    pub attributes: CharacterAttributes,
    #[serde(default)]
    pub memories: Vec<String>,
    #[serde(default)]
    pub properties: Document,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterAttributes {
    #[serde(default = "full_health")]
    pub health: f64,
    #[serde(default)]
    pub relationships: Document,
    #[serde(default)]
    pub reputation: f64,
    #[serde(default)]
    pub inventory: Vec<String>,
}

fn full_health() -> f64 {
    100.0
}

impl Default for CharacterAttributes {
    fn default() -> Self {
        Self {
            health: full_health(),
            relationships: Document::new(),
            reputation: 0.0,
            inventory: Vec::new(),
        }
    }
}

/// Fields covered by the state checksum
#[derive(Serialize)]
struct StateDigest<'a> {
    version: u64,
    timestamp: &'a DateTime<Utc>,
    regions: &'a BTreeMap<String, Region>,
    characters: &'a BTreeMap<String, Character>,
    relationships: &'a Document,
}

impl WorldState {
    /// Digest over `{version, timestamp, regions, characters, relationships}`
    pub fn compute_checksum(&self) -> String {
        checksum::digest(&StateDigest {
            version: self.version,
            timestamp: &self.timestamp,
            regions: &self.regions,
            characters: &self.characters,
            relationships: &self.relationships,
        })
    }

    /// Recompute and embed the checksum
    pub fn seal(&mut self) {
        self.metadata.checksum = self.compute_checksum();
    }

    /// The character representing `player_id`: either keyed by the player id
    /// or carrying it as `properties.playerId`.
    pub fn character_for_player(&self, player_id: &str) -> Option<&Character> {
        self.characters.get(player_id).or_else(|| {
            self.characters.values().find(|c| {
                c.properties
                    .get("playerId")
                    .and_then(|v| v.as_str())
                    .is_some_and(|p| p == player_id)
            })
        })
    }
}

/// Addresses a snapshot by version or by the `latest`/`current` alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateSelector {
    Latest,
    Version(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid state selector '{0}' (expected a version number, 'latest' or 'current')")]
pub struct InvalidSelector(pub String);

impl FromStr for StateSelector {
    type Err = InvalidSelector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "latest" | "current" => Ok(StateSelector::Latest),
            other => other
                .trim_start_matches('v')
                .parse::<u64>()
                .ok()
                .filter(|v| *v > 0)
                .map(StateSelector::Version)
                .ok_or_else(|| InvalidSelector(s.to_string())),
        }
    }
}

impl fmt::Display for StateSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateSelector::Latest => f.write_str("latest"),
            StateSelector::Version(v) => write!(f, "{v}"),
        }
    }
}

/// One entry of a region or character history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityHistory<T> {
    pub version: u64,
    pub timestamp: DateTime<Utc>,
    pub entity: T,
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
