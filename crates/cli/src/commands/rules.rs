// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! World rules commands

use super::required;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::fmt;
use wk_core::model::ButterflyEffect;
use wk_core::WorldRules;
use wk_engine::WorldCoordinator;

#[derive(Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Subcommand)]
pub enum RulesCommand {
    /// Show the current world rules
    Show,
    /// List butterfly effects whose trigger matches a keyword
    Effects {
        /// Keyword, matched case-insensitively against each trigger
        keyword: String,
    },
}

#[derive(Serialize)]
#[serde(transparent)]
struct RulesView<'a>(&'a WorldRules);

impl fmt::Display for RulesView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules = self.0;
        writeln!(f, "World rules v{}", rules.version)?;
        writeln!(f, "  Author: {}", rules.metadata.author)?;
        if !rules.metadata.description.is_empty() {
            writeln!(f, "  Description: {}", rules.metadata.description)?;
        }
        writeln!(f, "  Modified: {}", rules.last_modified.to_rfc3339())?;
        writeln!(
            f,
            "  Checksum: {}",
            rules.metadata.checksum.as_deref().unwrap_or("-")
        )?;
        write!(
            f,
            "  Butterfly effects: {}",
            rules.rules.butterfly_effects.len()
        )?;
        for effect in &rules.rules.butterfly_effects {
            write!(f, "\n    {}", EffectView(effect))?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct EffectView<'a>(&'a ButterflyEffect);

impl fmt::Display for EffectView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let effect = self.0;
        write!(
            f,
            "{:<18} trigger={:<10} p={:.2}  {}",
            effect.id, effect.trigger, effect.probability, effect.description
        )
    }
}

pub async fn handle(
    coordinator: &WorldCoordinator,
    command: RulesCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        RulesCommand::Show => {
            let rules = required("get_world_rules", coordinator.get_world_rules().await)?;
            output::print(&RulesView(&rules), format);
        }
        RulesCommand::Effects { keyword } => {
            let effects = required(
                "get_butterfly_effects",
                coordinator.get_butterfly_effects(&keyword).await,
            )?;
            let views: Vec<_> = effects.iter().map(EffectView).collect();
            output::print_list(&views, format, &format!("No effects triggered by '{keyword}'"));
        }
    }
    Ok(())
}
