// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the external collaborators of the storage engine

pub mod backup;
pub mod mirror;
pub mod traced;

pub use backup::{
    BackupAdapter, BackupError, BackupKind, BackupReceipt, BackupStats, FileBackupAdapter,
    NoOpBackupAdapter,
};
pub use mirror::{
    LocalBlobMirror, MirrorAdapter, MirrorError, MirrorHealth, MirrorStatus, NoOpMirrorAdapter,
};
pub use traced::{TracedBackupAdapter, TracedMirrorAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use backup::{BackupCall, FakeBackupAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use mirror::{FakeMirrorAdapter, MirrorCall};
