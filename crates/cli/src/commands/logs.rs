// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation log commands

use super::required;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::fmt;
use wk_core::oplog::{ExportFormat, LogReport};
use wk_core::LogEntry;
use wk_engine::WorldCoordinator;

#[derive(Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Subcommand)]
pub enum LogsCommand {
    /// Most recent operations, oldest first
    Recent {
        #[arg(short = 'n', long, default_value_t = 20)]
        lines: usize,
    },
    /// Operations whose message, operation, id or error mention some text
    Search { text: String },
    /// Statistics, per-operation performance and recommendations
    Report,
    /// Write the buffered log to `<data>/exports/`
    Export {
        /// csv or jsonl
        #[arg(default_value = "jsonl")]
        export_format: ExportFormat,
    },
}

#[derive(Serialize)]
#[serde(transparent)]
struct EntryRow<'a>(&'a LogEntry);

impl fmt::Display for EntryRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.0;
        write!(
            f,
            "{} {:<5} {:<28} {}",
            e.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            e.level.as_str(),
            e.operation_key(),
            e.message
        )?;
        if let Some(id) = &e.id {
            write!(f, " [{id}]")?;
        }
        if let Some(ms) = e.duration_ms {
            write!(f, " ({ms}ms)")?;
        }
        if let Some(error) = &e.error {
            write!(f, ": {error}")?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct ReportView<'a>(&'a LogReport);

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        writeln!(f, "Operation log report ({})", r.generated_at.to_rfc3339())?;
        writeln!(f, "  Buffered: {}/{}", r.buffered, r.capacity)?;
        writeln!(f, "  Error rate: {:.1}%", r.stats.error_rate * 100.0)?;
        if let Some(avg) = r.stats.average_duration_ms {
            writeln!(f, "  Average duration: {avg:.1}ms")?;
        }
        write!(f, "  Operations:")?;
        for (key, m) in &r.performance {
            write!(
                f,
                "\n    {:<28} count={:<5} success={:.0}%",
                key,
                m.count,
                m.success_rate * 100.0
            )?;
            if let Some(avg) = m.avg_duration_ms {
                write!(f, " avg={avg:.1}ms")?;
            }
        }
        if !r.recent_errors.is_empty() {
            write!(f, "\n  Recent errors:")?;
            for e in &r.recent_errors {
                write!(f, "\n    {}", EntryRow(e))?;
            }
        }
        if !r.recommendations.is_empty() {
            write!(f, "\n  Recommendations:")?;
            for rec in &r.recommendations {
                write!(f, "\n    - {rec}")?;
            }
        }
        Ok(())
    }
}

pub async fn handle(
    coordinator: &WorldCoordinator,
    command: LogsCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        LogsCommand::Recent { lines } => {
            let entries = required("get_recent_logs", coordinator.get_recent_logs(lines))?;
            let rows: Vec<_> = entries.iter().map(EntryRow).collect();
            output::print_list(&rows, format, "No operations logged");
        }
        LogsCommand::Search { text } => {
            let entries = required("search_logs", coordinator.search_logs(&text))?;
            let rows: Vec<_> = entries.iter().map(EntryRow).collect();
            output::print_list(&rows, format, &format!("No operations mention '{text}'"));
        }
        LogsCommand::Report => {
            let report = required("get_log_report", coordinator.get_log_report())?;
            output::print(&ReportView(&report), format);
        }
        LogsCommand::Export { export_format } => {
            let path = required("export_logs", coordinator.export_logs(export_format))?;
            match format {
                OutputFormat::Text => println!("Exported log to {path}"),
                OutputFormat::Json => println!("{}", serde_json::json!({ "path": path })),
            }
        }
    }
    Ok(())
}
