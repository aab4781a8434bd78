// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wk-core: domain model for the worldkeep storage engine
//!
//! This crate provides:
//! - The persisted entities (world rules, actions, world-state snapshots)
//! - Checksums over their canonical JSON
//! - Pure validation, per entity and across stores
//! - The operation logger
//! - Built-in bootstrap content, clocks and id generators

pub mod bootstrap;
pub mod checksum;
pub mod clock;
pub mod id;
pub mod model;
pub mod oplog;
pub mod validation;

pub use bootstrap::{BootstrapProvider, BuiltinBootstrap};
pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{is_safe_record_id, IdGen, SequentialIdGen, UuidIdGen};
pub use model::{
    Action, ActionQuery, ActionStatus, ActionSubmission, Consequence, Document, StateQuery,
    StateSelector, WorldRules, WorldState,
};
pub use oplog::{Layer, LogEntry, LogLevel, OperationLogger};
pub use validation::{CrossLayerReport, ValidationErrors, ValidationIssue, ValidationReport};
