// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-slot store for the world rules

use crate::context::StoreContext;
use crate::error::StoreError;
use std::time::Instant;
use wk_adapters::MirrorAdapter;
use wk_core::model::ButterflyEffect;
use wk_core::validation::validate_world_rules;
use wk_core::{Clock, Layer, LogEntry, WorldRules};

/// Location of the one rules document
pub const RULES_PATH: &str = "blueprint/world-rules.json";
/// Record id used in logs, the ledger and backups
pub const RULES_ID: &str = "world-rules";

#[derive(Clone)]
pub struct BlueprintStore<M, C> {
    ctx: StoreContext<M, C>,
}

impl<M: MirrorAdapter, C: Clock> BlueprintStore<M, C> {
    pub fn new(ctx: StoreContext<M, C>) -> Self {
        Self { ctx }
    }

    /// Validate, stamp, seal and persist the rules, then mirror them
    pub async fn write(&self, mut rules: WorldRules) -> Result<WorldRules, StoreError> {
        let start = Instant::now();
        let result = self.write_inner(&mut rules).await;
        self.finish("write", start, &result, || {
            format!("rules v{} written", rules.version)
        });
        result?;

        let bytes = serde_json::to_vec(&rules)?;
        self.ctx
            .mirror_document(Layer::Blueprint, RULES_ID, &bytes)
            .await;
        Ok(rules)
    }

    async fn write_inner(&self, rules: &mut WorldRules) -> Result<(), StoreError> {
        let now = self.ctx.clock.now();
        validate_world_rules(rules, now).into_result("world rules")?;
        rules.last_modified = now;
        rules.seal();
        self.ctx.files.write(RULES_PATH, rules).await?;
        Ok(())
    }

    /// The persisted rules, or the built-in default when none are stored
    pub async fn read(&self) -> Result<WorldRules, StoreError> {
        match self.read_persisted().await? {
            Some(rules) => Ok(rules),
            None => {
                let now = self.ctx.clock.now();
                self.ctx.log(LogEntry::success(
                    now,
                    Layer::Blueprint,
                    "read",
                    "no rules stored, serving defaults",
                ));
                Ok(self.ctx.bootstrap.default_rules(now))
            }
        }
    }

    /// The persisted rules, verified; `None` when nothing is stored
    pub async fn read_persisted(&self) -> Result<Option<WorldRules>, StoreError> {
        let start = Instant::now();
        let result = self.load_verified().await;
        if result.is_err() || matches!(result, Ok(Some(_))) {
            self.finish("read", start, &result, || "rules read".to_string());
        }
        result
    }

    async fn load_verified(&self) -> Result<Option<WorldRules>, StoreError> {
        let Some(rules) = self.ctx.files.read::<WorldRules>(RULES_PATH).await? else {
            return Ok(None);
        };
        if let Some(expected) = &rules.metadata.checksum {
            let actual = rules.compute_checksum();
            if *expected != actual {
                return Err(StoreError::Integrity {
                    kind: "world rules",
                    id: RULES_ID.to_string(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }
        Ok(Some(rules))
    }

    /// Zero or one stored rulesets
    pub async fn list(&self) -> Result<Vec<WorldRules>, StoreError> {
        Ok(self.read_persisted().await?.into_iter().collect())
    }

    pub async fn exists(&self) -> Result<bool, StoreError> {
        self.ctx.files.exists(RULES_PATH).await
    }

    /// Remove the stored rules; reads fall back to defaults afterwards
    pub async fn delete(&self) -> Result<bool, StoreError> {
        let start = Instant::now();
        let result = self.ctx.files.remove(RULES_PATH).await;
        self.finish("delete", start, &result, || "rules deleted".to_string());
        result
    }

    /// Butterfly effects whose trigger contains `keyword`, ignoring case
    pub async fn butterfly_effects(
        &self,
        keyword: &str,
    ) -> Result<Vec<ButterflyEffect>, StoreError> {
        let rules = self.read().await?;
        Ok(rules
            .butterfly_effects_matching(keyword)
            .into_iter()
            .cloned()
            .collect())
    }

    fn finish<T>(
        &self,
        operation: &str,
        start: Instant,
        result: &Result<T, StoreError>,
        message: impl FnOnce() -> String,
    ) {
        let now = self.ctx.clock.now();
        let entry = match result {
            Ok(_) => LogEntry::success(now, Layer::Blueprint, operation, message()),
            Err(e) => LogEntry::failure(now, Layer::Blueprint, operation, e),
        };
        self.ctx
            .log(entry.with_id(RULES_ID).with_duration(start.elapsed()));
    }
}

#[cfg(test)]
#[path = "blueprint_tests.rs"]
mod tests;
