// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structural validation for stored entities.
//!
//! Every check is a pure function over borrowed input. A check collects all
//! violations rather than stopping at the first, and reports them as errors
//! (which block a write) or warnings (which do not). Cross-store consistency
//! lives in [`cross_layer`] and never blocks a write.

mod action;
mod cross_layer;
mod rules;
mod state;

pub use action::{validate_action, validate_status_transition};
pub use cross_layer::{validate_cross_layer, CrossLayerReport, CrossLayerSummary};
pub use rules::validate_world_rules;
pub use state::validate_world_state;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One violation found by a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Dotted path of the offending field, e.g. `metadata.confidence`
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Checksum the entity would carry if written now
    pub checksum: String,
    /// Size of the serialized entity in bytes
    pub size: usize,
    pub validated_at: DateTime<Utc>,
}

/// Outcome of validating a single entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub metadata: ReportMetadata,
}

impl ValidationReport {
    /// Turn a failed report into an error listing every violation
    pub fn into_result(self, entity: &'static str) -> Result<ValidationReport, ValidationErrors> {
        if self.valid {
            Ok(self)
        } else {
            Err(ValidationErrors {
                entity,
                errors: self.errors,
            })
        }
    }
}

/// Every error from a failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub entity: &'static str,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn single(entity: &'static str, issue: ValidationIssue) -> Self {
        Self {
            entity,
            errors: vec![issue],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} validation failed with {} error(s):",
            self.entity,
            self.errors.len()
        )?;
        for (i, error) in self.errors.iter().enumerate() {
            write!(f, "\n  {}: {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Accumulates issues while a check walks an entity
#[derive(Debug, Default)]
struct Findings {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Findings {
    fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(field, message));
    }

    fn warn(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue::new(field, message));
    }

    fn require_text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.error(field, "is required");
        }
    }

    fn require_unit_interval(&mut self, field: &str, value: f64) {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            self.error(field, format!("must be between 0 and 1, got {value}"));
        }
    }

    fn finish<T: Serialize>(
        self,
        entity: &T,
        checksum: String,
        validated_at: DateTime<Utc>,
    ) -> ValidationReport {
        let size = serde_json::to_vec(entity).map(|b| b.len()).unwrap_or(0);
        ValidationReport {
            valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
            metadata: ReportMetadata {
                checksum,
                size,
                validated_at,
            },
        }
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
