// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wk-storage: the three persistent stores
//!
//! - [`BlueprintStore`]: the single world-rules document
//! - [`ActionQueueStore`]: one record per player action
//! - [`WorldStateStore`]: immutable, versioned world snapshots
//!
//! All three write pretty JSON below one data directory, verify checksums
//! on read and copy each write to an optional blob mirror.

mod actions;
mod blueprint;
mod context;
mod error;
mod files;
mod ledger;
mod locks;
mod world_state;

#[cfg(test)]
mod test_fixtures;

pub use actions::{ActionQueueStore, ACTIONS_DIR};
pub use blueprint::{BlueprintStore, RULES_ID, RULES_PATH};
pub use context::StoreContext;
pub use error::StoreError;
pub use files::JsonFiles;
pub use ledger::{MirrorCounters, MirrorLedger};
pub use locks::KeyedLocks;
pub use world_state::{WorldStateStore, STATES_DIR};
