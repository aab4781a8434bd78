// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! worldkeep storage coordinator and its configuration

pub mod config;
mod coordinator;
mod envelope;
mod error;
mod status;
mod wiring;

pub use config::{default_data_dir, ConfigError, EngineConfig, CONFIG_FILE};
pub use coordinator::{CoordinatorDeps, StorageCoordinator, SNAPSHOTS_DIR};
pub use envelope::Envelope;
pub use error::CoordinatorError;
pub use status::{DemoSnapshot, LogSummary, StoreStatus, StoreStatuses, SystemStatus};
pub use wiring::{open_configured, ConfiguredBackup, ConfiguredMirror, WorldCoordinator};
