// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{Findings, ValidationIssue, ValidationReport};
use crate::id::is_safe_record_id;
use crate::model::{Action, ActionStatus};
use chrono::{DateTime, Utc};

/// Check an action's identity, intent, confidence and parsed intent.
///
/// An empty id is accepted: the store assigns one on write.
pub fn validate_action(action: &Action, now: DateTime<Utc>) -> ValidationReport {
    let mut findings = Findings::default();

    if !action.id.is_empty() && !is_safe_record_id(&action.id) {
        findings.error(
            "id",
            format!("'{}' is not a valid record id", action.id),
        );
    }
    findings.require_text("playerId", &action.player_id);
    findings.require_text("intent", &action.intent);
    findings.require_unit_interval("metadata.confidence", action.metadata.confidence);

    if let Some(parsed) = &action.metadata.parsed_intent {
        findings.require_text("metadata.parsedIntent.actionType", &parsed.action_type);
        findings.require_text("metadata.parsedIntent.urgency", &parsed.urgency);
    }

    if action.metadata.confidence < 0.3 && action.metadata.confidence >= 0.0 {
        findings.warn(
            "metadata.confidence",
            format!("low parser confidence {}", action.metadata.confidence),
        );
    }
    if action.timestamp > now {
        findings.warn("timestamp", "is in the future");
    }

    match (&action.status, &action.consequences) {
        (ActionStatus::Pending | ActionStatus::Processing, Some(c)) if !c.is_empty() => {
            findings.warn("consequences", "attached before the action finished");
        }
        _ => {}
    }
    if let Some(consequences) = &action.consequences {
        for (i, consequence) in consequences.iter().enumerate() {
            findings.require_text(&format!("consequences[{i}].id"), &consequence.id);
            findings.require_text(
                &format!("consequences[{i}].description"),
                &consequence.description,
            );
        }
    }

    let checksum = action.compute_verification_hash();
    findings.finish(action, checksum, now)
}

/// Whether an action may move from `from` to `to`
pub fn validate_status_transition(
    from: ActionStatus,
    to: ActionStatus,
) -> Result<(), ValidationIssue> {
    if from.can_transition_to(to) {
        return Ok(());
    }
    let message = if from.is_terminal() {
        format!("action is already {from}; terminal actions accept no transition")
    } else {
        format!("cannot move from {from} to {to}")
    };
    Err(ValidationIssue::new("status", message))
}
