// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in world content served when a store has nothing persisted
//!
//! Cold reads of the blueprint and of the world state never fail: the stores
//! ask a [`BootstrapProvider`] for a sealed default instead. Defaults are
//! returned to the caller but not written.

use crate::model::{
    ButterflyEffect, Character, CharacterAttributes, Document, Effect, Region, RuleSet,
    RulesMetadata, StateMetadata, WorldRules, WorldState,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// Source of default rules and the genesis world state
pub trait BootstrapProvider: Send + Sync + 'static {
    fn default_rules(&self, now: DateTime<Utc>) -> WorldRules;

    /// Version 1 of the world
    fn default_state(&self, now: DateTime<Utc>) -> WorldState;
}

/// The stock starting world: a village, a forest and a mountain range
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinBootstrap;

pub const DEFAULT_RULES_VERSION: &str = "1.0.0";

impl BootstrapProvider for BuiltinBootstrap {
    fn default_rules(&self, now: DateTime<Utc>) -> WorldRules {
        let mut rules = WorldRules {
            version: DEFAULT_RULES_VERSION.to_string(),
            last_modified: now,
            rules: RuleSet {
                physics: doc(json!({
                    "gravity": 9.81,
                    "timeFlow": "linear",
                    "dayLength": 24,
                    "magicSystem": { "enabled": true, "manaRegenPerHour": 5 }
                })),
                character_behavior: doc(json!({
                    "memoryRetention": "long",
                    "relationshipDecayPerDay": 0.01,
                    "reactionToViolence": "flee_or_fight",
                    "tradeWillingness": 0.6
                })),
                action_constraints: doc(json!({
                    "maxActionsPerHour": 30,
                    "maxIntentLength": 500,
                    "forbiddenActions": ["teleport", "resurrect"]
                })),
                butterfly_effects: vec![
                    ButterflyEffect {
                        id: "forest_fire".to_string(),
                        trigger: "fire".to_string(),
                        description: "Fire spreads through dry woodland".to_string(),
                        probability: 0.3,
                        effects: vec![Effect {
                            kind: "environmental".to_string(),
                            target: "whispering_woods".to_string(),
                            change: doc(json!({ "status": "burning" })),
                            duration: Some("3d".to_string()),
                            cascading: Some(true),
                            permanent: None,
                        }],
                    },
                    ButterflyEffect {
                        id: "market_shortage".to_string(),
                        trigger: "steal".to_string(),
                        description: "Theft unsettles the village market".to_string(),
                        probability: 0.5,
                        effects: vec![Effect {
                            kind: "economic".to_string(),
                            target: "millbrook".to_string(),
                            change: doc(json!({ "prices": 1.2 })),
                            duration: Some("1d".to_string()),
                            cascading: None,
                            permanent: Some(false),
                        }],
                    },
                    ButterflyEffect {
                        id: "mountain_pass".to_string(),
                        trigger: "mine".to_string(),
                        description: "Deep mining opens a new pass through the peaks".to_string(),
                        probability: 0.1,
                        effects: vec![Effect {
                            kind: "geographic".to_string(),
                            target: "iron_peaks".to_string(),
                            change: doc(json!({ "passOpen": true })),
                            duration: None,
                            cascading: None,
                            permanent: Some(true),
                        }],
                    },
                ],
            },
            metadata: RulesMetadata {
                description: "Built-in world rules".to_string(),
                author: "worldkeep".to_string(),
                checksum: None,
            },
        };
        rules.seal();
        rules
    }

    fn default_state(&self, now: DateTime<Utc>) -> WorldState {
        let regions = [
            region("millbrook", "Millbrook", "village", 120, &["harvest_festival"]),
            region("whispering_woods", "Whispering Woods", "forest", 15, &[]),
            region("iron_peaks", "Iron Peaks", "mountains", 40, &["rockslide"]),
        ];
        let characters = [
            character("elder_maren", "Elder Maren", "village_elder", "millbrook", 35.0),
            character("scout_tavin", "Scout Tavin", "scout", "whispering_woods", 10.0),
        ];

        let mut state = WorldState {
            version: 1,
            previous_version: None,
            timestamp: now,
            regions: regions.into_iter().map(|r| (r.id.clone(), r)).collect(),
            characters: characters.into_iter().map(|c| (c.id.clone(), c)).collect(),
            relationships: doc(json!({
                "elder_maren": { "scout_tavin": { "type": "mentor", "strength": 0.7 } }
            })),
            economy: doc(json!({
                "currency": "silver",
                "inflation": 0.02,
                "tradeRoutes": ["millbrook-iron_peaks"]
            })),
            environment: doc(json!({
                "season": "spring",
                "weather": "clear",
                "timeOfDay": "morning"
            })),
            metadata: StateMetadata {
                checksum: String::new(),
                action_count: 0,
                description: "Genesis world state".to_string(),
            },
        };
        state.seal();
        state
    }
}

fn region(id: &str, name: &str, kind: &str, population: u64, events: &[&str]) -> Region {
    Region {
        id: id.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        status: "peaceful".to_string(),
        population,
        economy: Document::new(),
        events: events.iter().map(|e| e.to_string()).collect(),
        properties: Document::new(),
    }
}

fn character(id: &str, name: &str, kind: &str, location: &str, reputation: f64) -> Character {
    Character {
        id: id.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        location: location.to_string(),
        status: "active".to_string(),
        attributes: CharacterAttributes {
            reputation,
            ..CharacterAttributes::default()
        },
        memories: Vec::new(),
        properties: Document::new(),
    }
}

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
