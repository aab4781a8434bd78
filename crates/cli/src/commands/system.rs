// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Whole-world commands: init, status, snapshot and consistency check

use super::required;
use crate::error::WkError;
use crate::output::{self, OutputFormat};
use serde::Serialize;
use std::fmt;
use wk_core::validation::ValidationIssue;
use wk_core::{CrossLayerReport, Document};
use wk_engine::{DemoSnapshot, StoreStatus, SystemStatus, WorldCoordinator};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitSummary {
    data_dir: String,
    rules_version: String,
    state_version: u64,
    created_state: bool,
}

impl fmt::Display for InitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "World ready in {}", self.data_dir)?;
        writeln!(f, "  Rules: v{}", self.rules_version)?;
        write!(f, "  State: v{}", self.state_version)?;
        if self.created_state {
            write!(f, " (genesis)")?;
        }
        Ok(())
    }
}

/// Persist default rules and the genesis state when they are missing
pub async fn init(coordinator: &WorldCoordinator, format: OutputFormat) -> anyhow::Result<()> {
    let rules = required(
        "initialize_world_rules",
        coordinator.initialize_world_rules().await,
    )?;
    let status = required("get_system_status", coordinator.get_system_status().await)?;
    let (state_version, created_state) = match status.latest_state_version {
        Some(version) => (version, false),
        None => {
            let state = required(
                "create_world_state_version",
                coordinator
                    .create_world_state_version(&Document::new())
                    .await,
            )?;
            (state.version, true)
        }
    };
    let summary = InitSummary {
        data_dir: coordinator.config().data_dir.display().to_string(),
        rules_version: rules.version,
        state_version,
        created_state,
    };
    output::print(&summary, format);
    Ok(())
}

#[derive(Serialize)]
#[serde(transparent)]
struct StatusView<'a>(&'a SystemStatus);

fn store_line(f: &mut fmt::Formatter<'_>, name: &str, store: &StoreStatus) -> fmt::Result {
    match &store.error {
        Some(error) => write!(f, "\n    {name:<10} unavailable: {error}"),
        None => write!(f, "\n    {name:<10} {} record(s)", store.count),
    }
}

impl fmt::Display for StatusView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        writeln!(
            f,
            "worldkeep {} ({})",
            if s.healthy { "healthy" } else { "degraded" },
            s.data_dir
        )?;
        write!(f, "  Stores:")?;
        store_line(f, "blueprint", &s.stores.blueprint)?;
        store_line(f, "actions", &s.stores.actions)?;
        store_line(f, "states", &s.stores.states)?;
        match s.latest_state_version {
            Some(v) => write!(f, "\n  Latest state: v{v}")?,
            None => write!(f, "\n  Latest state: none (genesis default)")?,
        }
        write!(f, "\n  Mirror: {:?}", s.mirror.status)?;
        if let Some(detail) = &s.mirror.detail {
            write!(f, " ({detail})")?;
        }
        for (store, counters) in &s.mirror_ledger {
            write!(
                f,
                "\n    {store:<10} mirrored={} pending={}",
                counters.mirrored, counters.pending
            )?;
        }
        write!(
            f,
            "\n  Backups: {} (completed={}, failed={})",
            if s.backup.enabled { "enabled" } else { "disabled" },
            s.backup.completed,
            s.backup.failed
        )?;
        write!(
            f,
            "\n  Operation log: {}/{} buffered, error rate {:.1}%",
            s.logs.buffered,
            s.logs.capacity,
            s.logs.error_rate * 100.0
        )?;
        if let Some(file) = &s.logs.file {
            write!(f, "\n    file: {file}")?;
        }
        Ok(())
    }
}

pub async fn status(coordinator: &WorldCoordinator, format: OutputFormat) -> anyhow::Result<()> {
    let status = required("get_system_status", coordinator.get_system_status().await)?;
    output::print(&StatusView(&status), format);
    Ok(())
}

#[derive(Serialize)]
#[serde(transparent)]
struct ReportView<'a>(&'a CrossLayerReport);

fn issue_lines(f: &mut fmt::Formatter<'_>, title: &str, issues: &[ValidationIssue]) -> fmt::Result {
    if !issues.is_empty() {
        write!(f, "\n  {title}:")?;
        for issue in issues {
            write!(f, "\n    - {issue}")?;
        }
    }
    Ok(())
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        write!(
            f,
            "Consistency: {} (rules v{}, state v{}, {} action(s), {} completed, {} player(s))",
            if r.valid { "ok" } else { "INCONSISTENT" },
            r.summary.rules_version,
            r.summary.state_version,
            r.summary.total_actions,
            r.summary.completed_actions,
            r.summary.distinct_players
        )?;
        issue_lines(f, "Errors", &r.errors)?;
        issue_lines(f, "Warnings", &r.warnings)?;
        if !r.recommendations.is_empty() {
            write!(f, "\n  Recommendations:")?;
            for rec in &r.recommendations {
                write!(f, "\n    - {rec}")?;
            }
        }
        Ok(())
    }
}

/// Cross-store consistency report; with `strict`, an inconsistent world
/// fails the command
pub async fn check(
    coordinator: &WorldCoordinator,
    strict: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = required("validate_consistency", coordinator.validate_consistency().await)?;
    output::print(&ReportView(&report), format);
    if strict && !report.valid {
        return Err(WkError::new(format!(
            "world is inconsistent: {} error(s)",
            report.errors.len()
        ))
        .into());
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(transparent)]
struct SnapshotView<'a>(&'a DemoSnapshot);

impl fmt::Display for SnapshotView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        writeln!(f, "Snapshot taken at {}", s.created_at.to_rfc3339())?;
        if let Some(path) = &s.path {
            writeln!(f, "  File: {path}")?;
        }
        write!(
            f,
            "  Rules v{}, {} action(s), state v{}, consistency {}",
            s.rules.version,
            s.actions.len(),
            s.state.version,
            if s.consistency.valid { "ok" } else { "INCONSISTENT" }
        )
    }
}

pub async fn snapshot(coordinator: &WorldCoordinator, format: OutputFormat) -> anyhow::Result<()> {
    let snapshot = required("create_demo_snapshot", coordinator.create_demo_snapshot().await)?;
    output::print(&SnapshotView(&snapshot), format);
    Ok(())
}
