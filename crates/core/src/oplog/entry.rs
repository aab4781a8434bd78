// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured operation log entries

use crate::model::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Storage layer an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Blueprint,
    Actions,
    State,
    Coordinator,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Blueprint => "blueprint",
            Layer::Actions => "actions",
            Layer::State => "state",
            Layer::Coordinator => "coordinator",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blueprint" => Ok(Layer::Blueprint),
            "actions" => Ok(Layer::Actions),
            "state" => Ok(Layer::State),
            "coordinator" => Ok(Layer::Coordinator),
            other => Err(format!("unknown layer '{other}'")),
        }
    }
}

/// One record of a store operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub layer: Layer,
    pub operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Document>,
}

impl LogEntry {
    pub fn new(
        timestamp: DateTime<Utc>,
        level: LogLevel,
        layer: Layer,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            level,
            layer,
            operation: operation.into(),
            id: None,
            message: message.into(),
            duration_ms: None,
            success: None,
            error: None,
            metadata: None,
        }
    }

    /// Successful operation at info level
    pub fn success(
        timestamp: DateTime<Utc>,
        layer: Layer,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let mut entry = Self::new(timestamp, LogLevel::Info, layer, operation, message);
        entry.success = Some(true);
        entry
    }

    /// Failed operation at error level
    pub fn failure(
        timestamp: DateTime<Utc>,
        layer: Layer,
        operation: impl Into<String>,
        error: impl fmt::Display,
    ) -> Self {
        let error = error.to_string();
        let operation = operation.into();
        let message = format!("{operation} failed");
        let mut entry = Self::new(timestamp, LogLevel::Error, layer, operation, message);
        entry.success = Some(false);
        entry.error = Some(error);
        entry
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_duration(mut self, elapsed: Duration) -> Self {
        self.duration_ms = Some(elapsed.as_millis() as u64);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata
            .get_or_insert_with(Document::new)
            .insert(key.into(), value.into());
        self
    }

    /// Key used for per-operation aggregation, `layer.operation`
    pub fn operation_key(&self) -> String {
        format!("{}.{}", self.layer, self.operation)
    }

    /// Case-insensitive match against the textual fields
    pub fn mentions(&self, needle_lower: &str) -> bool {
        let hit = |s: &str| s.to_lowercase().contains(needle_lower);
        hit(&self.message)
            || hit(&self.operation)
            || hit(self.layer.as_str())
            || self.id.as_deref().is_some_and(hit)
            || self.error.as_deref().is_some_and(hit)
            || self
                .metadata
                .as_ref()
                .is_some_and(|m| hit(&serde_json::Value::Object(m.clone()).to_string()))
    }
}

/// Selects entries by exact layer, level, operation and id, and by time range
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub layer: Option<Layer>,
    pub level: Option<LogLevel>,
    pub operation: Option<String>,
    pub id: Option<String>,
    /// Inclusive lower bound
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper bound
    pub until: Option<DateTime<Utc>>,
}

impl LogFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.layer.is_none_or(|l| entry.layer == l)
            && self.level.is_none_or(|l| entry.level == l)
            && self
                .operation
                .as_deref()
                .is_none_or(|op| entry.operation == op)
            && self
                .id
                .as_deref()
                .is_none_or(|id| entry.id.as_deref() == Some(id))
            && self.since.is_none_or(|t| entry.timestamp >= t)
            && self.until.is_none_or(|t| entry.timestamp <= t)
    }
}
