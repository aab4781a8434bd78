// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CSV and JSONL renderings of log entries

use super::entry::LogEntry;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Jsonl,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Jsonl => "jsonl",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "jsonl" | "json" | "ndjson" => Ok(ExportFormat::Jsonl),
            other => Err(format!("unknown export format '{other}' (expected csv or jsonl)")),
        }
    }
}

pub const CSV_HEADER: &str = "timestamp,level,layer,operation,id,message,durationMs,success,error";

pub fn to_csv<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for entry in entries {
        let row = [
            entry.timestamp.to_rfc3339(),
            entry.level.to_string(),
            entry.layer.to_string(),
            entry.operation.clone(),
            entry.id.clone().unwrap_or_default(),
            entry.message.clone(),
            entry.duration_ms.map(|d| d.to_string()).unwrap_or_default(),
            entry.success.map(|s| s.to_string()).unwrap_or_default(),
            entry.error.clone().unwrap_or_default(),
        ];
        let cells: Vec<String> = row.iter().map(|cell| csv_cell(cell)).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

pub fn to_jsonl<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> String {
    let mut out = String::new();
    for entry in entries {
        if let Ok(line) = serde_json::to_string(entry) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

fn csv_cell(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
