// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exclusive advisory lock on the data directory

use crate::error::WkError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;

const LOCK_FILE: &str = ".wk.lock";

/// Held for the duration of one command; released on drop
pub struct DataDirLock {
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    file: File,
}

impl DataDirLock {
    pub fn acquire(data_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(data_dir.join(LOCK_FILE))?;
        if file.try_lock_exclusive().is_err() {
            return Err(WkError::lock_held(data_dir).into());
        }
        tracing::debug!(data_dir = %data_dir.display(), "data directory locked");
        Ok(Self { file })
    }
}
