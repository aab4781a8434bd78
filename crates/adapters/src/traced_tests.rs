// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::backup::FakeBackupAdapter;
use crate::mirror::FakeMirrorAdapter;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

#[test]
fn traced_mirror_write_logs_span_and_ref() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedMirrorAdapter::new(FakeMirrorAdapter::new());
        traced.write(b"hello").await
    });

    let blob_ref = result.unwrap();
    assert!(logs.contains("mirror.write"), "Logs:\n{logs}");
    assert!(logs.contains("blob mirrored"), "Logs:\n{logs}");
    assert!(logs.contains(&blob_ref), "Logs:\n{logs}");
    assert!(logs.contains("elapsed_ms"), "Logs:\n{logs}");
}

#[test]
fn traced_mirror_failure_is_a_warning() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeMirrorAdapter::new();
        fake.set_failing(true);
        TracedMirrorAdapter::new(fake).write(b"hello").await
    });

    assert!(result.is_err());
    assert!(logs.contains("WARN"), "Logs:\n{logs}");
    assert!(logs.contains("write pending"), "Logs:\n{logs}");
}

#[test]
fn traced_mirror_degraded_health_is_logged() {
    let (logs, health) = with_tracing(|| async {
        let fake = FakeMirrorAdapter::new();
        fake.set_failing(true);
        TracedMirrorAdapter::new(fake).health().await
    });

    assert_eq!(health.status, MirrorStatus::Degraded);
    assert!(logs.contains("mirror degraded"), "Logs:\n{logs}");
}

#[test]
fn traced_backup_logs_location() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedBackupAdapter::new(FakeBackupAdapter::new());
        traced
            .backup(BackupKind::State, "v3", &json!({ "version": 3 }))
            .await
    });

    assert!(result.is_ok());
    assert!(logs.contains("backup.write"), "Logs:\n{logs}");
    assert!(logs.contains("fake://state/v3"), "Logs:\n{logs}");
}

#[tokio::test]
async fn traced_wrappers_delegate() {
    let fake = FakeBackupAdapter::new();
    let traced = TracedBackupAdapter::new(fake.clone());
    traced
        .backup(BackupKind::Action, "a-1", &json!({}))
        .await
        .unwrap();
    assert_eq!(fake.calls().len(), 1);
    assert_eq!(traced.stats().completed, 1);

    let mirror = FakeMirrorAdapter::new();
    let traced = TracedMirrorAdapter::new(mirror.clone());
    let blob_ref = traced.write(b"abc").await.unwrap();
    assert_eq!(traced.read(&blob_ref).await.unwrap(), b"abc");
    assert_eq!(mirror.blob_count(), 1);
}
