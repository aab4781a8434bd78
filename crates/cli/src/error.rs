// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.

use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct WkError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl WkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Another `wk` process holds the data directory
    pub fn lock_held(data_dir: &Path) -> Self {
        WkError::new(format!(
            "data directory '{}' is in use",
            data_dir.display()
        ))
        .with_context("another wk command is running against the same data directory")
        .with_suggestion("wait for the other command to finish")
        .with_suggestion("or point this command elsewhere with --data-dir / WK_DATA_DIR")
    }

    /// A coordinator operation answered with a failed envelope
    pub fn rejected(operation: &str, error: &str) -> Self {
        let err = WkError::new(format!("{operation} failed: {error}"));
        if error.contains("integrity check failed") {
            err.with_context("a stored record no longer matches its checksum")
                .with_suggestion("inspect the record file and restore it from <data>/backups")
        } else if error.contains("not found") {
            err.with_suggestion("list what exists with: wk action list / wk state history")
        } else {
            err
        }
    }

    /// An action that was expected to exist does not
    pub fn missing(kind: &str, id: &str) -> Self {
        WkError::new(format!("{kind} '{id}' not found"))
            .with_suggestion("list what exists with: wk action list / wk state history")
    }
}

impl fmt::Display for WkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for WkError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_lists_context_and_suggestions() {
        let err = WkError::new("Something went wrong")
            .with_context("First context")
            .with_suggestion("Try this")
            .with_suggestion("Or this");

        let output = format!("{}", err);
        assert!(output.contains("error: Something went wrong"));
        assert!(output.contains("-> First context"));
        assert!(output.contains("1. Try this"));
        assert!(output.contains("2. Or this"));
    }

    #[test]
    fn lock_held_names_the_directory() {
        let output = WkError::lock_held(Path::new("/srv/world")).to_string();
        assert!(output.contains("/srv/world"));
        assert!(output.contains("WK_DATA_DIR"));
    }

    #[test]
    fn integrity_failures_suggest_backups() {
        let output = WkError::rejected(
            "get_action",
            "integrity check failed for action 'a1': expected checksum x, computed y",
        )
        .to_string();
        assert!(output.contains("backups"));
    }
}
