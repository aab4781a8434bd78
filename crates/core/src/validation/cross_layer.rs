// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::ValidationIssue;
use crate::model::{Action, ActionStatus, WorldRules, WorldState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Findings about consistency between the three stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossLayerReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub recommendations: Vec<String>,
    pub summary: CrossLayerSummary,
    pub checked_at: DateTime<Utc>,
}

impl CrossLayerReport {
    /// Errors, warnings and recommendations together
    pub fn issue_count(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.recommendations.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossLayerSummary {
    pub rules_version: String,
    pub state_version: u64,
    pub total_actions: usize,
    pub completed_actions: usize,
    pub distinct_players: usize,
}

/// Compare the ruleset, the action queue and a world snapshot.
///
/// - the completed-action count must equal `metadata.actionCount` (warning)
/// - completed actions should carry consequences (warning)
/// - every player must have a character (error)
/// - the snapshot must not predate the newest action (error)
/// - butterfly triggers no intent ever matched (recommendation)
pub fn validate_cross_layer(
    rules: &WorldRules,
    actions: &[Action],
    state: &WorldState,
    now: DateTime<Utc>,
) -> CrossLayerReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();

    let completed: Vec<&Action> = actions
        .iter()
        .filter(|a| a.status == ActionStatus::Completed)
        .collect();

    let recorded = state.metadata.action_count;
    if recorded != completed.len() as u64 {
        warnings.push(ValidationIssue::new(
            "metadata.actionCount",
            format!(
                "state records {recorded} completed actions but the queue holds {}",
                completed.len()
            ),
        ));
    }

    for action in &completed {
        if !action.has_consequences() {
            warnings.push(ValidationIssue::new(
                format!("actions.{}.consequences", action.id),
                "completed action has no consequences",
            ));
        }
    }

    let players: BTreeSet<&str> = actions.iter().map(|a| a.player_id.as_str()).collect();
    for player in &players {
        if state.character_for_player(player).is_none() {
            errors.push(ValidationIssue::new(
                format!("characters.{player}"),
                format!("player '{player}' has no character in state v{}", state.version),
            ));
        }
    }

    if let Some(newest) = actions.iter().map(|a| a.timestamp).max() {
        if state.timestamp < newest {
            errors.push(ValidationIssue::new(
                "timestamp",
                format!(
                    "state v{} ({}) predates the newest action ({})",
                    state.version,
                    state.timestamp.to_rfc3339(),
                    newest.to_rfc3339()
                ),
            ));
        }
    }

    if !actions.is_empty() {
        for effect in &rules.rules.butterfly_effects {
            if !actions.iter().any(|a| effect.is_triggered_by(&a.intent)) {
                recommendations.push(format!(
                    "butterfly effect '{}' (trigger '{}') has never been triggered; consider revising its trigger",
                    effect.id, effect.trigger
                ));
            }
        }
    }

    CrossLayerReport {
        valid: errors.is_empty(),
        errors,
        warnings,
        recommendations,
        summary: CrossLayerSummary {
            rules_version: rules.version.clone(),
            state_version: state.version,
            total_actions: actions.len(),
            completed_actions: completed.len(),
            distinct_players: players.len(),
        },
        checked_at: now,
    }
}
