// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted entities of the three storage layers

pub mod action;
pub mod merge;
pub mod query;
pub mod rules;
pub mod state;

/// Opaque JSON object; keys serialize in sorted order
pub type Document = serde_json::Map<String, serde_json::Value>;

pub use action::{
    Action, ActionMetadata, ActionStatus, ActionSubmission, Consequence, ParsedIntent,
    UnknownStatus,
};
pub use merge::{apply_modifications, deep_merge};
pub use query::{paginate, ActionQuery, ActionSortKey, SortOrder, StateQuery};
pub use rules::{ButterflyEffect, Effect, RuleSet, RulesMetadata, WorldRules};
pub use state::{
    Character, CharacterAttributes, EntityHistory, InvalidSelector, Region, StateMetadata,
    StateSelector, WorldState,
};
