// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action queue store
//!
//! One file per action, keyed by id. Actions are rewritten whole; status
//! changes and deletes run under a per-id lock so two updates to the same
//! action cannot interleave.

use crate::context::StoreContext;
use crate::error::StoreError;
use crate::locks::KeyedLocks;
use std::sync::Arc;
use std::time::Instant;
use wk_adapters::MirrorAdapter;
use wk_core::validation::{validate_action, validate_status_transition, ValidationErrors};
use wk_core::{
    is_safe_record_id, Action, ActionQuery, ActionStatus, Clock, Consequence, IdGen, Layer,
    LogEntry, LogLevel, ValidationIssue,
};

pub const ACTIONS_DIR: &str = "actions";

fn action_path(id: &str) -> String {
    format!("{ACTIONS_DIR}/{id}.json")
}

#[derive(Clone)]
pub struct ActionQueueStore<M, C, I> {
    ctx: StoreContext<M, C>,
    ids: I,
    locks: Arc<KeyedLocks>,
}

impl<M: MirrorAdapter, C: Clock, I: IdGen> ActionQueueStore<M, C, I> {
    pub fn new(ctx: StoreContext<M, C>, ids: I) -> Self {
        Self {
            ctx,
            ids,
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Persist an action, assigning an id when it has none
    pub async fn write(&self, mut action: Action) -> Result<Action, StoreError> {
        if action.id.is_empty() {
            action.id = self.ids.next();
        }
        let _guard = self.locks.lock(&action.id).await;
        self.persist(action, "write").await
    }

    async fn persist(&self, mut action: Action, operation: &str) -> Result<Action, StoreError> {
        let start = Instant::now();
        let now = self.ctx.clock.now();

        if let Err(e) = validate_action(&action, now).into_result("action") {
            let err = StoreError::from(e);
            self.log_result(operation, &action.id, start, Err(&err));
            return Err(err);
        }
        action.seal();

        let bytes = serde_json::to_vec(&action)?;
        action.metadata.external_mirror_ref = self
            .ctx
            .mirror_document(Layer::Actions, &action.id, &bytes)
            .await;

        let result = self.ctx.files.write(&action_path(&action.id), &action).await;
        self.log_result(operation, &action.id, start, result.as_ref().map(|_| ()));
        result?;
        Ok(action)
    }

    /// A verified action; `None` when it does not exist
    pub async fn read(&self, id: &str) -> Result<Option<Action>, StoreError> {
        ensure_safe_id(id)?;
        let start = Instant::now();
        let result = self.load_verified(id).await;
        if let Err(e) = &result {
            self.log_result("read", id, start, Err(e));
        }
        result
    }

    async fn load_verified(&self, id: &str) -> Result<Option<Action>, StoreError> {
        let Some(action) = self.ctx.files.read::<Action>(&action_path(id)).await? else {
            return Ok(None);
        };
        let actual = action.compute_verification_hash();
        if action.metadata.verification_hash != actual {
            return Err(StoreError::Integrity {
                kind: "action",
                id: id.to_string(),
                expected: action.metadata.verification_hash.clone(),
                actual,
            });
        }
        Ok(Some(action))
    }

    /// Every readable action matching `query`. Unreadable or tampered
    /// records are skipped and logged.
    pub async fn list(&self, query: &ActionQuery) -> Result<Vec<Action>, StoreError> {
        let start = Instant::now();
        let mut actions = Vec::new();
        for id in self.ctx.files.list_stems(ACTIONS_DIR).await? {
            if !is_safe_record_id(&id) {
                continue;
            }
            match self.load_verified(&id).await {
                Ok(Some(action)) => actions.push(action),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(id = id.as_str(), error = %e, "skipping unreadable action");
                    self.ctx.log(
                        LogEntry::failure(self.ctx.clock.now(), Layer::Actions, "list", &e)
                            .with_id(id.as_str()),
                    );
                }
            }
        }
        let total = actions.len();
        let selected = query.apply(actions);
        self.ctx.log(
            LogEntry::new(
                self.ctx.clock.now(),
                LogLevel::Debug,
                Layer::Actions,
                "list",
                format!("{} of {total} actions selected", selected.len()),
            )
            .with_duration(start.elapsed()),
        );
        Ok(selected)
    }

    /// Pending actions, oldest first
    pub async fn pending_actions(&self, limit: Option<usize>) -> Result<Vec<Action>, StoreError> {
        self.list(&ActionQuery::pending(limit)).await
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.ctx.files.list_stems(ACTIONS_DIR).await?.len())
    }

    /// Move an action along its state machine, optionally attaching
    /// consequences, and rewrite it
    pub async fn update_status(
        &self,
        id: &str,
        status: ActionStatus,
        consequences: Option<Vec<Consequence>>,
    ) -> Result<Action, StoreError> {
        ensure_safe_id(id)?;
        let _guard = self.locks.lock(id).await;

        let Some(mut action) = self.load_verified(id).await? else {
            return Err(StoreError::NotFound {
                kind: "action",
                id: id.to_string(),
            });
        };
        if let Err(issue) = validate_status_transition(action.status, status) {
            let err = StoreError::Conflict(format!("action '{id}': {}", issue.message));
            self.log_result("update_status", id, Instant::now(), Err(&err));
            return Err(err);
        }

        action.status = status;
        action.timestamp = self.ctx.clock.now();
        if consequences.is_some() {
            action.consequences = consequences;
        }
        self.persist(action, "update_status").await
    }

    /// Delete a non-terminal action; `false` when it does not exist
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        ensure_safe_id(id)?;
        let _guard = self.locks.lock(id).await;
        let start = Instant::now();

        let result = match self.load_verified(id).await {
            Ok(None) => Ok(false),
            Ok(Some(action)) if action.status.is_terminal() => Err(StoreError::Conflict(format!(
                "action '{id}' is {} and can no longer be deleted",
                action.status
            ))),
            Ok(Some(_)) => self.ctx.files.remove(&action_path(id)).await,
            Err(e) => Err(e),
        };
        self.log_result("delete", id, start, result.as_ref().map(|_| ()));
        result
    }

    fn log_result(&self, operation: &str, id: &str, start: Instant, result: Result<(), &StoreError>) {
        let now = self.ctx.clock.now();
        let entry = match result {
            Ok(()) => LogEntry::success(now, Layer::Actions, operation, format!("action {id} {operation} ok")),
            Err(e) => LogEntry::failure(now, Layer::Actions, operation, e),
        };
        self.ctx.log(entry.with_id(id).with_duration(start.elapsed()));
    }
}

fn ensure_safe_id(id: &str) -> Result<(), StoreError> {
    if is_safe_record_id(id) {
        Ok(())
    } else {
        Err(ValidationErrors::single(
            "action",
            ValidationIssue::new("id", format!("'{id}' is not a valid record id")),
        )
        .into())
    }
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
