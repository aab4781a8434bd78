// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned world-state store
//!
//! Each snapshot is an immutable file `states/v<version>.json`. The highest
//! stored version is "current" and can never be deleted. Writes, transitions
//! and deletes are serialized behind one mutex that also guards the
//! in-memory current version.

use crate::context::StoreContext;
use crate::error::StoreError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use wk_adapters::MirrorAdapter;
use wk_core::model::{apply_modifications, Character, EntityHistory, Region};
use wk_core::validation::validate_world_state;
use wk_core::{
    Clock, Document, Layer, LogEntry, LogLevel, StateQuery, StateSelector, ValidationErrors,
    ValidationIssue, WorldState,
};

pub const STATES_DIR: &str = "states";

fn state_path(version: u64) -> String {
    format!("{STATES_DIR}/v{version}.json")
}

fn state_key(version: u64) -> String {
    format!("v{version}")
}

fn parse_stem(stem: &str) -> Option<u64> {
    stem.strip_prefix('v')?.parse().ok().filter(|v| *v > 0)
}

#[derive(Clone)]
pub struct WorldStateStore<M, C> {
    ctx: StoreContext<M, C>,
    /// Highest stored version; `None` while the store is empty
    current: Arc<Mutex<Option<u64>>>,
}

impl<M: MirrorAdapter, C: Clock> WorldStateStore<M, C> {
    /// Open the store, discovering the current version on disk
    pub async fn open(ctx: StoreContext<M, C>) -> Result<Self, StoreError> {
        let current = ctx
            .files
            .list_stems(STATES_DIR)
            .await?
            .iter()
            .filter_map(|stem| parse_stem(stem))
            .max();
        if let Some(version) = current {
            tracing::debug!(version, "world state store opened");
        }
        Ok(Self {
            ctx,
            current: Arc::new(Mutex::new(current)),
        })
    }

    pub async fn latest_version(&self) -> Option<u64> {
        *self.current.lock().await
    }

    /// Persist a snapshot. A version that is unset or not above the current
    /// one is replaced by `current + 1`.
    pub async fn write(&self, state: WorldState) -> Result<WorldState, StoreError> {
        let mut current = self.current.lock().await;
        self.write_locked(&mut current, state, "write").await
    }

    async fn write_locked(
        &self,
        current: &mut Option<u64>,
        mut state: WorldState,
        operation: &str,
    ) -> Result<WorldState, StoreError> {
        let start = Instant::now();
        let now = self.ctx.clock.now();
        let latest = current.unwrap_or(0);

        if state.version <= latest {
            state.version = latest + 1;
        }
        state.previous_version = *current;
        state.timestamp = now;

        if let Err(e) = validate_world_state(&state, now).into_result("world state") {
            let err = StoreError::from(e);
            self.log_result(operation, state.version, start, Err(&err));
            return Err(err);
        }
        state.seal();

        let result = self.ctx.files.write(&state_path(state.version), &state).await;
        self.log_result(operation, state.version, start, result.as_ref().map(|_| ()));
        let bytes = result?;
        *current = Some(state.version);

        self.ctx
            .mirror_document(Layer::State, &state_key(state.version), &bytes)
            .await;
        Ok(state)
    }

    /// Read a snapshot. An empty store serves the genesis default for
    /// `latest` and version 1 without persisting it.
    pub async fn read(&self, selector: StateSelector) -> Result<WorldState, StoreError> {
        let current = self.latest_version().await;
        let version = match (selector, current) {
            (StateSelector::Latest, Some(v)) => v,
            (StateSelector::Latest, None) | (StateSelector::Version(1), None) => {
                return Ok(self.genesis());
            }
            (StateSelector::Version(v), _) => v,
        };

        let start = Instant::now();
        match self.load_verified(version).await {
            Ok(Some(state)) => Ok(state),
            Ok(None) => Err(StoreError::NotFound {
                kind: "world state",
                id: state_key(version),
            }),
            Err(e) => {
                self.log_result("read", version, start, Err(&e));
                Err(e)
            }
        }
    }

    fn genesis(&self) -> WorldState {
        let now = self.ctx.clock.now();
        self.ctx.log(LogEntry::success(
            now,
            Layer::State,
            "read",
            "no state stored, serving genesis default",
        ));
        self.ctx.bootstrap.default_state(now)
    }

    async fn load_verified(&self, version: u64) -> Result<Option<WorldState>, StoreError> {
        let Some(state) = self.ctx.files.read::<WorldState>(&state_path(version)).await? else {
            return Ok(None);
        };
        let actual = state.compute_checksum();
        if state.metadata.checksum != actual {
            return Err(StoreError::Integrity {
                kind: "world state",
                id: state_key(version),
                expected: state.metadata.checksum.clone(),
                actual,
            });
        }
        Ok(Some(state))
    }

    /// Stored versions, ascending
    pub async fn versions(&self) -> Result<Vec<u64>, StoreError> {
        let mut versions: Vec<u64> = self
            .ctx
            .files
            .list_stems(STATES_DIR)
            .await?
            .iter()
            .filter_map(|stem| parse_stem(stem))
            .collect();
        versions.sort_unstable();
        Ok(versions)
    }

    /// Every readable snapshot matching `query`. Unreadable or tampered
    /// versions are skipped and logged.
    pub async fn list(&self, query: &StateQuery) -> Result<Vec<WorldState>, StoreError> {
        let start = Instant::now();
        let mut states = Vec::new();
        for version in self.versions().await? {
            match self.load_verified(version).await {
                Ok(Some(state)) => states.push(state),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(version, error = %e, "skipping unreadable world state");
                    self.ctx.log(
                        LogEntry::failure(self.ctx.clock.now(), Layer::State, "list", &e)
                            .with_id(state_key(version)),
                    );
                }
            }
        }
        let total = states.len();
        let selected = query.apply(states);
        self.ctx.log(
            LogEntry::new(
                self.ctx.clock.now(),
                LogLevel::Debug,
                Layer::State,
                "list",
                format!("{} of {total} versions selected", selected.len()),
            )
            .with_duration(start.elapsed()),
        );
        Ok(selected)
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.versions().await?.len())
    }

    /// Delete an older version; the current version is refused
    pub async fn delete(&self, version: u64) -> Result<bool, StoreError> {
        let current = self.current.lock().await;
        let start = Instant::now();
        let result = if *current == Some(version) {
            Err(StoreError::Conflict(format!(
                "version {version} is the current world state and cannot be deleted"
            )))
        } else {
            self.ctx.files.remove(&state_path(version)).await
        };
        self.log_result("delete", version, start, result.as_ref().map(|_| ()));
        result
    }

    /// Copy the latest snapshot, merge `modifications` over it and store
    /// the result as the next version
    pub async fn create_state_transition(
        &self,
        modifications: &Document,
    ) -> Result<WorldState, StoreError> {
        let mut current = self.current.lock().await;
        let base = match *current {
            Some(version) => self.load_verified(version).await?.ok_or_else(|| {
                StoreError::NotFound {
                    kind: "world state",
                    id: state_key(version),
                }
            })?,
            None => self.ctx.bootstrap.default_state(self.ctx.clock.now()),
        };

        let mut next = apply_modifications(&base, modifications).map_err(|e| {
            StoreError::from(ValidationErrors::single(
                "world state",
                ValidationIssue::new("modifications", e.to_string()),
            ))
        })?;
        next.version = 0;
        self.write_locked(&mut current, next, "transition").await
    }

    pub async fn region_history(
        &self,
        region_id: &str,
    ) -> Result<Vec<EntityHistory<Region>>, StoreError> {
        Ok(self
            .list(&StateQuery::default())
            .await?
            .into_iter()
            .filter_map(|state| {
                let version = state.version;
                let timestamp = state.timestamp;
                state
                    .regions
                    .into_iter()
                    .find(|(id, _)| id == region_id)
                    .map(|(_, entity)| EntityHistory {
                        version,
                        timestamp,
                        entity,
                    })
            })
            .collect())
    }

    pub async fn character_history(
        &self,
        character_id: &str,
    ) -> Result<Vec<EntityHistory<Character>>, StoreError> {
        Ok(self
            .list(&StateQuery::default())
            .await?
            .into_iter()
            .filter_map(|mut state| {
                state
                    .characters
                    .remove(character_id)
                    .map(|entity| EntityHistory {
                        version: state.version,
                        timestamp: state.timestamp,
                        entity,
                    })
            })
            .collect())
    }

    fn log_result(
        &self,
        operation: &str,
        version: u64,
        start: Instant,
        result: Result<(), &StoreError>,
    ) {
        let now = self.ctx.clock.now();
        let entry = match result {
            Ok(()) => LogEntry::success(
                now,
                Layer::State,
                operation,
                format!("world state v{version} {operation} ok"),
            ),
            Err(e) => LogEntry::failure(now, Layer::State, operation, e),
        };
        self.ctx
            .log(entry.with_id(state_key(version)).with_duration(start.elapsed()));
    }
}

#[cfg(test)]
#[path = "world_state_tests.rs"]
mod tests;
