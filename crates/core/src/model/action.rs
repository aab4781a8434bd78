// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Player actions and their status state machine
//!
//! ```text
//! pending ──> processing ──> completed
//!                      └───> failed
//! ```
//!
//! `completed` and `failed` are terminal.

use super::rules::Effect;
use super::Document;
use crate::checksum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle status of an [`Action`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// A status string outside the action state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action status '{0}' (expected pending, processing, completed or failed)")]
pub struct UnknownStatus(pub String);

impl ActionStatus {
    pub const ALL: [ActionStatus; 4] = [
        ActionStatus::Pending,
        ActionStatus::Processing,
        ActionStatus::Completed,
        ActionStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Pending => "pending",
            ActionStatus::Processing => "processing",
            ActionStatus::Completed => "completed",
            ActionStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionStatus::Completed | ActionStatus::Failed)
    }

    /// Whether the state machine allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: ActionStatus) -> bool {
        matches!(
            (self, next),
            (ActionStatus::Pending, ActionStatus::Processing)
                | (ActionStatus::Processing, ActionStatus::Completed)
                | (ActionStatus::Processing, ActionStatus::Failed)
        )
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ActionStatus::Pending),
            "processing" => Ok(ActionStatus::Processing),
            "completed" => Ok(ActionStatus::Completed),
            "failed" => Ok(ActionStatus::Failed),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// A player-submitted action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Record key; generated by the store when empty
    #[serde(default)]
    pub id: String,
    pub player_id: String,
    pub intent: String,
    #[serde(default)]
    pub original_input: String,
    pub timestamp: DateTime<Utc>,
    pub status: ActionStatus,
    pub metadata: ActionMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consequences: Option<Vec<Consequence>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMetadata {
    /// Parser confidence, in `[0, 1]`
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_intent: Option<ParsedIntent>,
    #[serde(default)]
    pub verification_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_mirror_ref: Option<String>,
}

/// Structured intent produced by the intent parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedIntent {
    pub action_type: String,
    pub urgency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Document::is_empty")]
    pub parameters: Document,
}

/// An outcome attached to an action once it has been processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consequence {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

/// Input for submitting a new action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSubmission {
    pub player_id: String,
    pub intent: String,
    #[serde(default)]
    pub original_input: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_intent: Option<ParsedIntent>,
}

fn default_confidence() -> f64 {
    1.0
}

/// Fields covered by the verification hash
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionDigest<'a> {
    id: &'a str,
    player_id: &'a str,
    intent: &'a str,
    timestamp: &'a DateTime<Utc>,
    status: ActionStatus,
}

impl Action {
    /// Build a pending action from a submission
    pub fn from_submission(
        id: impl Into<String>,
        submission: ActionSubmission,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let original_input = if submission.original_input.is_empty() {
            submission.intent.clone()
        } else {
            submission.original_input
        };
        Self {
            id: id.into(),
            player_id: submission.player_id,
            intent: submission.intent,
            original_input,
            timestamp,
            status: ActionStatus::Pending,
            metadata: ActionMetadata {
                confidence: submission.confidence,
                parsed_intent: submission.parsed_intent,
                verification_hash: String::new(),
                external_mirror_ref: None,
            },
            consequences: None,
        }
    }

    /// Digest over `{id, playerId, intent, timestamp, status}`
    pub fn compute_verification_hash(&self) -> String {
        checksum::digest(&ActionDigest {
            id: &self.id,
            player_id: &self.player_id,
            intent: &self.intent,
            timestamp: &self.timestamp,
            status: self.status,
        })
    }

    /// Recompute and embed the verification hash
    pub fn seal(&mut self) {
        self.metadata.verification_hash = self.compute_verification_hash();
    }

    pub fn action_type(&self) -> Option<&str> {
        self.metadata
            .parsed_intent
            .as_ref()
            .map(|intent| intent.action_type.as_str())
    }

    pub fn has_consequences(&self) -> bool {
        self.consequences.as_ref().is_some_and(|c| !c.is_empty())
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
