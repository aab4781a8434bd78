// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Linear filters, sorting and pagination for store listings

use super::action::{Action, ActionStatus};
use super::state::WorldState;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(format!("invalid sort order '{other}' (expected asc or desc)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionSortKey {
    Timestamp,
    PlayerId,
    /// Lifecycle order (pending, processing, completed, failed), not the
    /// alphabetical order of the status names
    Status,
    Confidence,
}

impl FromStr for ActionSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timestamp" => Ok(ActionSortKey::Timestamp),
            "playerId" | "player_id" | "player" => Ok(ActionSortKey::PlayerId),
            "status" => Ok(ActionSortKey::Status),
            "confidence" => Ok(ActionSortKey::Confidence),
            other => Err(format!(
                "invalid sort key '{other}' (expected timestamp, playerId, status or confidence)"
            )),
        }
    }
}

/// Listing query for the action queue.
///
/// Without `sort_by` the order is whatever the store scan produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActionStatus>,
    /// Matches `metadata.parsedIntent.actionType`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<ActionSortKey>,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

impl ActionQuery {
    pub fn for_player(player_id: impl Into<String>) -> Self {
        Self {
            player_id: Some(player_id.into()),
            ..Self::default()
        }
    }

    /// Oldest pending actions first
    pub fn pending(limit: Option<usize>) -> Self {
        Self {
            status: Some(ActionStatus::Pending),
            sort_by: Some(ActionSortKey::Timestamp),
            order: SortOrder::Asc,
            limit,
            ..Self::default()
        }
    }

    pub fn matches(&self, action: &Action) -> bool {
        self.player_id
            .as_deref()
            .is_none_or(|player| action.player_id == player)
            && self.status.is_none_or(|status| action.status == status)
            && self
                .action_type
                .as_deref()
                .is_none_or(|kind| action.action_type() == Some(kind))
    }

    /// Filter, then sort, then paginate
    pub fn apply(&self, actions: Vec<Action>) -> Vec<Action> {
        let mut selected: Vec<Action> = actions.into_iter().filter(|a| self.matches(a)).collect();

        if let Some(key) = self.sort_by {
            selected.sort_by(|a, b| self.order.apply(compare_actions(key, a, b)));
        }

        paginate(selected, self.offset, self.limit)
    }
}

fn compare_actions(key: ActionSortKey, a: &Action, b: &Action) -> Ordering {
    match key {
        ActionSortKey::Timestamp => a.timestamp.cmp(&b.timestamp),
        ActionSortKey::PlayerId => a.player_id.cmp(&b.player_id),
        ActionSortKey::Status => a.status.cmp(&b.status),
        ActionSortKey::Confidence => a.metadata.confidence.total_cmp(&b.metadata.confidence),
    }
    .then_with(|| a.id.cmp(&b.id))
}

/// Listing query for world-state versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_version: Option<u64>,
    /// Case-insensitive substring of `metadata.description`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_contains: Option<String>,
    #[serde(default = "newest_first")]
    pub order: SortOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

fn newest_first() -> SortOrder {
    SortOrder::Desc
}

impl Default for StateQuery {
    fn default() -> Self {
        Self {
            min_version: None,
            max_version: None,
            description_contains: None,
            order: newest_first(),
            limit: None,
            offset: 0,
        }
    }
}

impl StateQuery {
    pub fn matches(&self, state: &WorldState) -> bool {
        let needle = self.description_contains.as_ref().map(|d| d.to_lowercase());
        self.min_version.is_none_or(|min| state.version >= min)
            && self.max_version.is_none_or(|max| state.version <= max)
            && needle.is_none_or(|needle| {
                state.metadata.description.to_lowercase().contains(&needle)
            })
    }

    pub fn apply(&self, states: Vec<WorldState>) -> Vec<WorldState> {
        let mut selected: Vec<WorldState> =
            states.into_iter().filter(|s| self.matches(s)).collect();
        selected.sort_by(|a, b| self.order.apply(a.version.cmp(&b.version)));
        paginate(selected, self.offset, self.limit)
    }
}

/// Skip `offset` items, then keep at most `limit`
pub fn paginate<T>(items: Vec<T>, offset: usize, limit: Option<usize>) -> Vec<T> {
    let iter = items.into_iter().skip(offset);
    match limit {
        Some(limit) => iter.take(limit).collect(),
        None => iter.collect(),
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
