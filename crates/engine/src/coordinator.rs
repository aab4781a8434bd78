// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage coordinator: the single entry point over the three stores
//!
//! Every operation returns an [`Envelope`] and never panics. Successful
//! writes are followed by a best-effort backup that runs as a spawned task;
//! its outcome never changes the envelope already returned.

use crate::config::EngineConfig;
use crate::envelope::Envelope;
use crate::error::CoordinatorError;
use crate::status::{DemoSnapshot, LogSummary, StoreStatus, StoreStatuses, SystemStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use wk_adapters::{BackupAdapter, BackupKind, MirrorAdapter};
use wk_core::model::{ButterflyEffect, Character, EntityHistory, Region};
use wk_core::oplog::{ExportFormat, LogReport, OperationMetrics};
use wk_core::validation::validate_cross_layer;
use wk_core::{
    Action, ActionQuery, ActionStatus, ActionSubmission, BootstrapProvider, Clock, Consequence,
    CrossLayerReport, Document, IdGen, Layer, LogEntry, LogLevel, OperationLogger, StateQuery,
    StateSelector, WorldRules, WorldState,
};
use wk_storage::{
    ActionQueueStore, BlueprintStore, JsonFiles, MirrorLedger, StoreContext, StoreError,
    WorldStateStore, RULES_ID,
};

/// Directory, below the data root, that receives demo snapshots
pub const SNAPSHOTS_DIR: &str = "snapshots";

/// Collaborators injected into the coordinator
pub struct CoordinatorDeps<M, B, C, I> {
    pub mirror: M,
    pub backup: B,
    pub clock: C,
    pub ids: I,
    pub bootstrap: Arc<dyn BootstrapProvider>,
    pub logger: Arc<OperationLogger>,
}

pub struct StorageCoordinator<M, B, C, I> {
    config: EngineConfig,
    ctx: StoreContext<M, C>,
    blueprint: BlueprintStore<M, C>,
    actions: ActionQueueStore<M, C, I>,
    states: WorldStateStore<M, C>,
    backup: B,
    /// Outstanding backup tasks, awaited by [`StorageCoordinator::flush_backups`]
    backups: Mutex<Vec<JoinHandle<()>>>,
}

impl<M, B, C, I> StorageCoordinator<M, B, C, I>
where
    M: MirrorAdapter,
    B: BackupAdapter,
    C: Clock,
    I: IdGen,
{
    /// Open the stores below `config.data_dir`
    pub async fn open(
        config: EngineConfig,
        deps: CoordinatorDeps<M, B, C, I>,
    ) -> Result<Self, CoordinatorError> {
        tokio::fs::create_dir_all(&config.data_dir).await?;
        let ctx = StoreContext {
            files: JsonFiles::new(&config.data_dir),
            mirror: deps.mirror,
            clock: deps.clock,
            logger: deps.logger,
            bootstrap: deps.bootstrap,
            ledger: Arc::new(MirrorLedger::new()),
        };
        let states = WorldStateStore::open(ctx.clone()).await?;
        let coordinator = Self {
            blueprint: BlueprintStore::new(ctx.clone()),
            actions: ActionQueueStore::new(ctx.clone(), deps.ids),
            states,
            backup: deps.backup,
            backups: Mutex::new(Vec::new()),
            config,
            ctx,
        };
        coordinator.ctx.log(LogEntry::success(
            coordinator.ctx.clock.now(),
            Layer::Coordinator,
            "open",
            format!("storage opened at {}", coordinator.config.data_dir.display()),
        ));
        Ok(coordinator)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn logger(&self) -> &OperationLogger {
        &self.ctx.logger
    }

    // Blueprint

    /// Keep persisted rules, or persist the defaults when none exist
    pub async fn initialize_world_rules(&self) -> Envelope<WorldRules> {
        match self.blueprint.read_persisted().await {
            Ok(Some(rules)) => Envelope::ok(rules),
            Ok(None) => {
                let defaults = self.ctx.bootstrap.default_rules(self.ctx.clock.now());
                self.write_rules(defaults).await
            }
            Err(e) => Envelope::err(e),
        }
    }

    pub async fn update_world_rules(&self, rules: WorldRules) -> Envelope<WorldRules> {
        self.write_rules(rules).await
    }

    async fn write_rules(&self, rules: WorldRules) -> Envelope<WorldRules> {
        let result = self.blueprint.write(rules).await;
        if let Ok(rules) = &result {
            self.spawn_backup(BackupKind::Rules, RULES_ID.to_string(), rules);
        }
        Envelope::from_result(result)
    }

    pub async fn get_world_rules(&self) -> Envelope<WorldRules> {
        Envelope::from_result(self.blueprint.read().await)
    }

    pub async fn get_butterfly_effects(&self, trigger: &str) -> Envelope<Vec<ButterflyEffect>> {
        Envelope::from_result(self.blueprint.butterfly_effects(trigger).await)
    }

    // Actions

    /// Queue a new pending action for a player
    pub async fn submit_action(&self, request: ActionSubmission) -> Envelope<Action> {
        let action = Action::from_submission("", request, self.ctx.clock.now());
        let result = self.actions.write(action).await;
        if let Ok(action) = &result {
            self.spawn_backup(BackupKind::Action, action.id.clone(), action);
        }
        Envelope::from_result(result)
    }

    pub async fn get_action(&self, id: &str) -> Envelope<Action> {
        Envelope::from_option(self.actions.read(id).await)
    }

    pub async fn get_actions(&self, query: &ActionQuery) -> Envelope<Vec<Action>> {
        Envelope::from_result(self.actions.list(query).await)
    }

    pub async fn get_pending_actions(&self, limit: Option<usize>) -> Envelope<Vec<Action>> {
        Envelope::from_result(self.actions.pending_actions(limit).await)
    }

    /// Move an action to `status` (by name), optionally attaching consequences
    pub async fn update_action_status(
        &self,
        id: &str,
        status: &str,
        consequences: Option<Vec<Consequence>>,
    ) -> Envelope<Action> {
        let status = match status.parse::<ActionStatus>() {
            Ok(status) => status,
            Err(e) => return Envelope::err(e),
        };
        let result = self.actions.update_status(id, status, consequences).await;
        if let Ok(action) = &result {
            self.spawn_backup(BackupKind::Action, action.id.clone(), action);
        }
        Envelope::from_result(result)
    }

    pub async fn delete_action(&self, id: &str) -> Envelope<bool> {
        Envelope::from_result(self.actions.delete(id).await)
    }

    // World state

    pub async fn get_current_world_state(&self) -> Envelope<WorldState> {
        self.get_world_state(StateSelector::Latest).await
    }

    pub async fn get_world_state(&self, selector: StateSelector) -> Envelope<WorldState> {
        Envelope::from_result(self.states.read(selector).await)
    }

    /// Merge `modifications` over the latest snapshot and store the result
    /// as the next version
    pub async fn create_world_state_version(
        &self,
        modifications: &Document,
    ) -> Envelope<WorldState> {
        let result = self.states.create_state_transition(modifications).await;
        if let Ok(state) = &result {
            self.spawn_backup(BackupKind::State, format!("v{}", state.version), state);
        }
        Envelope::from_result(result)
    }

    pub async fn get_world_state_history(&self, query: &StateQuery) -> Envelope<Vec<WorldState>> {
        Envelope::from_result(self.states.list(query).await)
    }

    pub async fn get_region_history(&self, region_id: &str) -> Envelope<Vec<EntityHistory<Region>>> {
        Envelope::from_result(self.states.region_history(region_id).await)
    }

    pub async fn get_character_history(
        &self,
        character_id: &str,
    ) -> Envelope<Vec<EntityHistory<Character>>> {
        Envelope::from_result(self.states.character_history(character_id).await)
    }

    pub async fn delete_world_state_version(&self, version: u64) -> Envelope<bool> {
        Envelope::from_result(self.states.delete(version).await)
    }

    // Cross-store

    /// Cross-layer consistency of the live stores. Findings are reported,
    /// never enforced.
    pub async fn validate_consistency(&self) -> Envelope<CrossLayerReport> {
        let result = self.consistency_report().await;
        match &result {
            Ok(report) => {
                let level = if report.valid {
                    LogLevel::Info
                } else {
                    LogLevel::Warn
                };
                self.ctx.log(LogEntry::new(
                    self.ctx.clock.now(),
                    level,
                    Layer::Coordinator,
                    "validate_consistency",
                    format!(
                        "{} error(s), {} warning(s)",
                        report.errors.len(),
                        report.warnings.len()
                    ),
                ));
            }
            Err(e) => self.ctx.log(LogEntry::failure(
                self.ctx.clock.now(),
                Layer::Coordinator,
                "validate_consistency",
                e,
            )),
        }
        Envelope::from_result(result)
    }

    async fn consistency_report(&self) -> Result<CrossLayerReport, StoreError> {
        let (rules, actions, state) = self.load_all().await?;
        Ok(validate_cross_layer(&rules, &actions, &state, self.ctx.clock.now()))
    }

    async fn load_all(&self) -> Result<(WorldRules, Vec<Action>, WorldState), StoreError> {
        let rules = self.blueprint.read().await?;
        let actions = self.actions.list(&ActionQuery::default()).await?;
        let state = self.states.read(StateSelector::Latest).await?;
        Ok((rules, actions, state))
    }

    pub async fn get_system_status(&self) -> Envelope<SystemStatus> {
        let blueprint = StoreStatus::from_count(
            self.blueprint
                .list()
                .await
                .map(|rules| rules.len()),
        );
        let actions = StoreStatus::from_count(self.actions.count().await);
        let states = StoreStatus::from_count(self.states.count().await);
        let healthy = blueprint.available && actions.available && states.available;
        let stats = self.ctx.logger.stats();

        Envelope::ok(SystemStatus {
            checked_at: self.ctx.clock.now(),
            data_dir: self.config.data_dir.display().to_string(),
            healthy,
            stores: StoreStatuses {
                blueprint,
                actions,
                states,
            },
            latest_state_version: self.states.latest_version().await,
            mirror: self.ctx.mirror.health().await,
            mirror_ledger: self.ctx.ledger.snapshot(),
            backup: self.backup.stats(),
            logs: LogSummary {
                buffered: self.ctx.logger.len(),
                capacity: self.ctx.logger.capacity(),
                error_rate: stats.error_rate,
                file: self
                    .ctx
                    .logger
                    .file_path()
                    .map(|p| p.display().to_string()),
            },
        })
    }

    /// Export all three stores with a consistency report, also written to
    /// `<data>/snapshots/`
    pub async fn create_demo_snapshot(&self) -> Envelope<DemoSnapshot> {
        let result = self.write_snapshot().await;
        match &result {
            Ok(snapshot) => self.ctx.log(LogEntry::success(
                snapshot.created_at,
                Layer::Coordinator,
                "snapshot",
                format!(
                    "snapshot of rules v{}, {} action(s), state v{}",
                    snapshot.rules.version,
                    snapshot.actions.len(),
                    snapshot.state.version
                ),
            )),
            Err(e) => self.ctx.log(LogEntry::failure(
                self.ctx.clock.now(),
                Layer::Coordinator,
                "snapshot",
                e,
            )),
        }
        Envelope::from_result(result)
    }

    async fn write_snapshot(&self) -> Result<DemoSnapshot, StoreError> {
        let now = self.ctx.clock.now();
        let (rules, actions, state) = self.load_all().await?;
        let consistency = validate_cross_layer(&rules, &actions, &state, now);
        let mut snapshot = DemoSnapshot {
            created_at: now,
            rules,
            actions,
            state,
            consistency,
            path: None,
        };
        let rel = format!(
            "{SNAPSHOTS_DIR}/snapshot-{}.json",
            now.format("%Y%m%dT%H%M%S%.3fZ")
        );
        self.ctx.files.write(&rel, &snapshot).await?;
        snapshot.path = Some(self.ctx.files.path_of(&rel).display().to_string());
        Ok(snapshot)
    }

    /// Fetch a mirrored document by blob reference
    pub async fn read_mirrored_blob(&self, blob_ref: &str) -> Envelope<serde_json::Value> {
        let result = match self.ctx.read_mirrored(blob_ref).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        Envelope::from_result(result)
    }

    // Operation log

    pub fn get_performance_metrics(&self) -> Envelope<BTreeMap<String, OperationMetrics>> {
        Envelope::ok(self.ctx.logger.performance())
    }

    pub fn get_recent_logs(&self, n: usize) -> Envelope<Vec<LogEntry>> {
        Envelope::ok(self.ctx.logger.recent(n))
    }

    pub fn search_logs(&self, text: &str) -> Envelope<Vec<LogEntry>> {
        Envelope::ok(self.ctx.logger.search(text))
    }

    pub fn get_log_report(&self) -> Envelope<LogReport> {
        Envelope::ok(self.ctx.logger.report(self.ctx.clock.now()))
    }

    /// Write the buffered log to `<data>/exports/` and return the file path
    pub fn export_logs(&self, format: ExportFormat) -> Envelope<String> {
        let result = self
            .ctx
            .logger
            .export_to(&self.config.exports_dir(), format, self.ctx.clock.now())
            .map(|path| path.display().to_string());
        if let Ok(path) = &result {
            self.ctx.log(LogEntry::success(
                self.ctx.clock.now(),
                Layer::Coordinator,
                "export_logs",
                format!("log exported to {path}"),
            ));
        }
        Envelope::from_result(result)
    }

    // Backups

    fn spawn_backup<T: Serialize>(&self, kind: BackupKind, id: String, entity: &T) {
        let document = match serde_json::to_value(entity) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(%kind, id = id.as_str(), error = %e, "backup skipped");
                return;
            }
        };
        let backup = self.backup.clone();
        let logger = Arc::clone(&self.ctx.logger);
        let clock = self.ctx.clock.clone();

        let handle = tokio::spawn(async move {
            if let Err(e) = backup.backup(kind, &id, &document).await {
                logger.record(
                    LogEntry::new(
                        clock.now(),
                        LogLevel::Warn,
                        Layer::Coordinator,
                        "backup",
                        format!("backup of {kind} {id} failed: {e}"),
                    )
                    .with_id(id),
                );
            }
        });

        let mut backups = self.backups.lock().unwrap_or_else(|e| e.into_inner());
        backups.retain(|h| !h.is_finished());
        backups.push(handle);
    }

    /// Wait for every backup started so far
    pub async fn flush_backups(&self) {
        let handles = std::mem::take(&mut *self.backups.lock().unwrap_or_else(|e| e.into_inner()));
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "backup task failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
