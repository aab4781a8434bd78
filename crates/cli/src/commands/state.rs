// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! World state commands

use super::required;
use crate::output::{self, clip, OutputFormat};
use anyhow::Context;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::fmt;
use wk_core::model::{Character, EntityHistory, Region, SortOrder};
use wk_core::{Document, StateQuery, StateSelector, WorldState};
use wk_engine::WorldCoordinator;

#[derive(Args)]
pub struct StateArgs {
    #[command(subcommand)]
    pub command: StateCommand,
}

#[derive(Subcommand)]
pub enum StateCommand {
    /// Show a world-state version
    Show {
        /// Version number, `latest` or `current`
        #[arg(default_value = "latest")]
        version: StateSelector,
    },
    /// List stored versions
    History {
        #[arg(long)]
        min: Option<u64>,
        #[arg(long)]
        max: Option<u64>,
        /// Case-insensitive text in the version description
        #[arg(long)]
        contains: Option<String>,
        #[arg(long, default_value = "desc")]
        order: SortOrder,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Create the next version by merging modifications over the latest
    Transition {
        /// JSON object, or `@path` to read it from a file
        modifications: String,
    },
    /// A region across every stored version, newest first
    Region { id: String },
    /// A character across every stored version, newest first
    Character { id: String },
    /// Delete an older version
    Delete { version: u64 },
}

fn parse_modifications(arg: &str) -> anyhow::Result<Document> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read modifications from {path}"))?,
        None => arg.to_string(),
    };
    serde_json::from_str(&text).context("modifications must be a JSON object")
}

#[derive(Serialize)]
#[serde(transparent)]
struct StateRow<'a>(&'a WorldState);

impl fmt::Display for StateRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        write!(
            f,
            "v{:<6} {}  regions={:<3} characters={:<3} {}",
            s.version,
            s.timestamp.format("%Y-%m-%d %H:%M:%S"),
            s.regions.len(),
            s.characters.len(),
            clip(&s.metadata.description, 40)
        )
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct StateDetail<'a>(&'a WorldState);

impl fmt::Display for StateDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        match s.previous_version {
            Some(previous) => writeln!(f, "World state v{} (after v{previous})", s.version)?,
            None => writeln!(f, "World state v{}", s.version)?,
        }
        writeln!(f, "  Timestamp: {}", s.timestamp.to_rfc3339())?;
        if !s.metadata.description.is_empty() {
            writeln!(f, "  Description: {}", s.metadata.description)?;
        }
        writeln!(f, "  Actions folded in: {}", s.metadata.action_count)?;
        writeln!(f, "  Checksum: {}", s.metadata.checksum)?;
        write!(f, "  Regions ({}):", s.regions.len())?;
        for region in s.regions.values() {
            write!(f, "\n    {}", RegionLine(region))?;
        }
        write!(f, "\n  Characters ({}):", s.characters.len())?;
        for character in s.characters.values() {
            write!(f, "\n    {}", CharacterLine(character))?;
        }
        Ok(())
    }
}

struct RegionLine<'a>(&'a Region);

impl fmt::Display for RegionLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        write!(
            f,
            "{:<18} {:<20} {:<10} {:<10} pop={}",
            r.id,
            clip(&r.name, 20),
            r.kind,
            r.status,
            r.population
        )
    }
}

struct CharacterLine<'a>(&'a Character);

impl fmt::Display for CharacterLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        write!(
            f,
            "{:<18} {:<20} {:<14} @{:<18} {}",
            c.id,
            clip(&c.name, 20),
            c.kind,
            c.location,
            c.status
        )
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct RegionHistoryRow<'a>(&'a EntityHistory<Region>);

impl fmt::Display for RegionHistoryRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{:<6} {}", self.0.version, RegionLine(&self.0.entity))
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct CharacterHistoryRow<'a>(&'a EntityHistory<Character>);

impl fmt::Display for CharacterHistoryRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{:<6} {}", self.0.version, CharacterLine(&self.0.entity))
    }
}

pub async fn handle(
    coordinator: &WorldCoordinator,
    command: StateCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        StateCommand::Show { version } => {
            let state = required("get_world_state", coordinator.get_world_state(version).await)?;
            output::print(&StateDetail(&state), format);
        }
        StateCommand::History {
            min,
            max,
            contains,
            order,
            limit,
            offset,
        } => {
            let query = StateQuery {
                min_version: min,
                max_version: max,
                description_contains: contains,
                order,
                limit,
                offset,
            };
            let states = required(
                "get_world_state_history",
                coordinator.get_world_state_history(&query).await,
            )?;
            let rows: Vec<_> = states.iter().map(StateRow).collect();
            output::print_list(&rows, format, "No stored versions");
        }
        StateCommand::Transition { modifications } => {
            let modifications = parse_modifications(&modifications)?;
            let state = required(
                "create_world_state_version",
                coordinator.create_world_state_version(&modifications).await,
            )?;
            output::print(&StateDetail(&state), format);
        }
        StateCommand::Region { id } => {
            let history = required("get_region_history", coordinator.get_region_history(&id).await)?;
            let rows: Vec<_> = history.iter().map(RegionHistoryRow).collect();
            output::print_list(&rows, format, &format!("Region '{id}' appears in no version"));
        }
        StateCommand::Character { id } => {
            let history = required(
                "get_character_history",
                coordinator.get_character_history(&id).await,
            )?;
            let rows: Vec<_> = history.iter().map(CharacterHistoryRow).collect();
            output::print_list(&rows, format, &format!("Character '{id}' appears in no version"));
        }
        StateCommand::Delete { version } => {
            let deleted = required(
                "delete_world_state_version",
                coordinator.delete_world_state_version(version).await,
            )?;
            match (format, deleted) {
                (OutputFormat::Json, _) => {
                    println!("{}", serde_json::json!({ "version": version, "deleted": deleted }))
                }
                (OutputFormat::Text, true) => println!("Deleted world state v{version}"),
                (OutputFormat::Text, false) => println!("World state v{version} does not exist"),
            }
        }
    }
    Ok(())
}
