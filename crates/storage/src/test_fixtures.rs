// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store contexts backed by a temp dir, a fake mirror and a fake clock

use crate::context::StoreContext;
use crate::files::JsonFiles;
use crate::ledger::MirrorLedger;
use std::sync::Arc;
use tempfile::TempDir;
use wk_adapters::FakeMirrorAdapter;
use wk_core::{BuiltinBootstrap, FakeClock, OperationLogger};

pub(crate) struct Fixture {
    pub dir: TempDir,
    pub ctx: StoreContext<FakeMirrorAdapter, FakeClock>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let ctx = StoreContext {
            files: JsonFiles::new(dir.path()),
            mirror: FakeMirrorAdapter::new(),
            clock: FakeClock::new(),
            logger: Arc::new(OperationLogger::in_memory(200)),
            bootstrap: Arc::new(BuiltinBootstrap),
            ledger: Arc::new(MirrorLedger::new()),
        };
        Self { dir, ctx }
    }

    /// Overwrite a stored file with a mutated copy of its JSON
    pub fn tamper(&self, rel: &str, mutate: impl FnOnce(&mut serde_json::Value)) {
        let path = self.dir.path().join(rel);
        let mut value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        mutate(&mut value);
        std::fs::write(&path, serde_json::to_vec_pretty(&value).unwrap()).unwrap();
    }
}
