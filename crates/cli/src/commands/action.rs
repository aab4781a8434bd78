// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action queue commands

use super::{data, required};
use crate::error::WkError;
use crate::output::{self, clip, OutputFormat};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::fmt;
use wk_core::model::{ActionSortKey, ParsedIntent, SortOrder};
use wk_core::{Action, ActionQuery, ActionStatus, ActionSubmission, Consequence, Document};
use wk_engine::WorldCoordinator;

#[derive(Args)]
pub struct ActionArgs {
    #[command(subcommand)]
    pub command: ActionCommand,
}

#[derive(Subcommand)]
pub enum ActionCommand {
    /// Queue a new player action
    Submit {
        #[arg(long)]
        player: String,
        /// What the player intends to do
        #[arg(long)]
        intent: String,
        /// Raw player input, when it differs from the intent
        #[arg(long)]
        input: Option<String>,
        /// Parser confidence in [0, 1]
        #[arg(long, default_value_t = 1.0)]
        confidence: f64,
        /// Parsed action type (e.g. explore, trade)
        #[arg(long = "type")]
        action_type: Option<String>,
        #[arg(long, default_value = "normal", requires = "action_type")]
        urgency: String,
        #[arg(long, requires = "action_type")]
        target: Option<String>,
    },
    /// List actions
    List {
        #[arg(long)]
        player: Option<String>,
        #[arg(long)]
        status: Option<ActionStatus>,
        #[arg(long = "type")]
        action_type: Option<String>,
        /// timestamp, playerId, status or confidence
        #[arg(long)]
        sort: Option<ActionSortKey>,
        #[arg(long, default_value = "asc")]
        order: SortOrder,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Show one action
    Show { id: String },
    /// Move an action to a new status
    Update {
        id: String,
        /// pending, processing, completed or failed
        status: String,
        /// Consequence as `id=description`; repeatable
        #[arg(long = "consequence", value_parser = parse_consequence)]
        consequences: Vec<Consequence>,
    },
    /// Pending actions, oldest first
    Pending {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Delete a pending or processing action
    Delete { id: String },
}

fn parse_consequence(s: &str) -> Result<Consequence, String> {
    let (id, description) = s
        .split_once('=')
        .ok_or_else(|| format!("expected id=description, got '{s}'"))?;
    if id.trim().is_empty() || description.trim().is_empty() {
        return Err(format!("expected id=description, got '{s}'"));
    }
    Ok(Consequence {
        id: id.trim().to_string(),
        description: description.trim().to_string(),
        effects: Vec::new(),
    })
}

#[derive(Serialize)]
#[serde(transparent)]
struct ActionRow<'a>(&'a Action);

impl fmt::Display for ActionRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.0;
        write!(
            f,
            "{:<36} {:<16} {:<10} {}  {}",
            a.id,
            clip(&a.player_id, 16),
            a.status.as_str(),
            a.timestamp.format("%Y-%m-%d %H:%M:%S"),
            clip(&a.intent, 48)
        )
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct ActionDetail<'a>(&'a Action);

impl fmt::Display for ActionDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.0;
        writeln!(f, "Action: {}", a.id)?;
        writeln!(f, "  Player: {}", a.player_id)?;
        writeln!(f, "  Status: {}", a.status)?;
        writeln!(f, "  Intent: {}", a.intent)?;
        if a.original_input != a.intent {
            writeln!(f, "  Input: {}", a.original_input)?;
        }
        writeln!(f, "  Timestamp: {}", a.timestamp.to_rfc3339())?;
        writeln!(f, "  Confidence: {:.2}", a.metadata.confidence)?;
        if let Some(parsed) = &a.metadata.parsed_intent {
            writeln!(f, "  Type: {} ({})", parsed.action_type, parsed.urgency)?;
        }
        if let Some(blob_ref) = &a.metadata.external_mirror_ref {
            writeln!(f, "  Mirror: {blob_ref}")?;
        }
        write!(f, "  Hash: {}", a.metadata.verification_hash)?;
        if let Some(consequences) = &a.consequences {
            write!(f, "\n  Consequences:")?;
            for c in consequences {
                write!(f, "\n    {}: {}", c.id, c.description)?;
            }
        }
        Ok(())
    }
}

pub async fn handle(
    coordinator: &WorldCoordinator,
    command: ActionCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        ActionCommand::Submit {
            player,
            intent,
            input,
            confidence,
            action_type,
            urgency,
            target,
        } => {
            let request = ActionSubmission {
                player_id: player,
                intent,
                original_input: input.unwrap_or_default(),
                confidence,
                parsed_intent: action_type.map(|action_type| ParsedIntent {
                    action_type,
                    urgency,
                    target,
                    parameters: Document::new(),
                }),
            };
            let action = required("submit_action", coordinator.submit_action(request).await)?;
            output::print(&ActionDetail(&action), format);
        }
        ActionCommand::List {
            player,
            status,
            action_type,
            sort,
            order,
            limit,
            offset,
        } => {
            let query = ActionQuery {
                player_id: player,
                status,
                action_type,
                sort_by: sort,
                order,
                limit,
                offset,
            };
            let actions = required("get_actions", coordinator.get_actions(&query).await)?;
            let rows: Vec<_> = actions.iter().map(ActionRow).collect();
            output::print_list(&rows, format, "No actions");
        }
        ActionCommand::Show { id } => {
            let action = data("get_action", coordinator.get_action(&id).await)?
                .ok_or_else(|| WkError::missing("action", &id))?;
            output::print(&ActionDetail(&action), format);
        }
        ActionCommand::Update {
            id,
            status,
            consequences,
        } => {
            let consequences = (!consequences.is_empty()).then_some(consequences);
            let action = required(
                "update_action_status",
                coordinator
                    .update_action_status(&id, &status, consequences)
                    .await,
            )?;
            output::print(&ActionDetail(&action), format);
        }
        ActionCommand::Pending { limit } => {
            let actions = required(
                "get_pending_actions",
                coordinator.get_pending_actions(limit).await,
            )?;
            let rows: Vec<_> = actions.iter().map(ActionRow).collect();
            output::print_list(&rows, format, "No pending actions");
        }
        ActionCommand::Delete { id } => {
            let deleted = required("delete_action", coordinator.delete_action(&id).await)?;
            if !deleted {
                return Err(WkError::missing("action", &id).into());
            }
            match format {
                OutputFormat::Text => println!("Deleted action {id}"),
                OutputFormat::Json => println!("{}", serde_json::json!({ "deleted": id })),
            }
        }
    }
    Ok(())
}
