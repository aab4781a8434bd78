// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;
use wk_adapters::{FakeBackupAdapter, FakeMirrorAdapter, MirrorStatus};
use wk_core::{BuiltinBootstrap, FakeClock, SequentialIdGen};

type TestCoordinator =
    StorageCoordinator<FakeMirrorAdapter, FakeBackupAdapter, FakeClock, SequentialIdGen>;

struct Harness {
    _dir: TempDir,
    coordinator: TestCoordinator,
    mirror: FakeMirrorAdapter,
    backup: FakeBackupAdapter,
    clock: FakeClock,
}

async fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let mirror = FakeMirrorAdapter::new();
    let backup = FakeBackupAdapter::new();
    let clock = FakeClock::new();
    let deps = CoordinatorDeps {
        mirror: mirror.clone(),
        backup: backup.clone(),
        clock: clock.clone(),
        ids: SequentialIdGen::new("act"),
        bootstrap: Arc::new(BuiltinBootstrap),
        logger: Arc::new(OperationLogger::in_memory(500)),
    };
    let coordinator = StorageCoordinator::open(EngineConfig::for_data_dir(dir.path()), deps)
        .await
        .unwrap();
    Harness {
        _dir: dir,
        coordinator,
        mirror,
        backup,
        clock,
    }
}

fn submission(player: &str, intent: &str) -> ActionSubmission {
    ActionSubmission {
        player_id: player.to_string(),
        intent: intent.to_string(),
        original_input: String::new(),
        confidence: 0.8,
        parsed_intent: None,
    }
}

fn doc(value: serde_json::Value) -> Document {
    value.as_object().cloned().unwrap()
}

fn consequence(id: &str) -> Vec<Consequence> {
    vec![Consequence {
        id: id.to_string(),
        description: "word spreads through the village".to_string(),
        effects: vec![],
    }]
}

#[tokio::test]
async fn initialize_world_rules_is_idempotent() {
    let h = harness().await;
    let first = h.coordinator.initialize_world_rules().await;
    assert!(first.success);
    h.clock.advance(Duration::from_secs(60));
    let second = h.coordinator.initialize_world_rules().await;

    assert_eq!(first.data, second.data);
    h.coordinator.flush_backups().await;
    assert_eq!(h.backup.calls().len(), 1);
}

#[tokio::test]
async fn invalid_rules_come_back_as_failed_envelope() {
    let h = harness().await;
    let mut rules = h.coordinator.get_world_rules().await.data.unwrap();
    rules.version = "latest".to_string();

    let envelope = h.coordinator.update_world_rules(rules).await;
    assert!(!envelope.success);
    assert!(envelope.error.unwrap().contains("version"));
}

#[tokio::test]
async fn submit_action_queues_pending_and_backs_up() {
    let h = harness().await;
    let action = h
        .coordinator
        .submit_action(submission("elder_maren", "call a council"))
        .await
        .data
        .unwrap();

    assert_eq!(action.id, "act-1");
    assert_eq!(action.status, ActionStatus::Pending);
    assert_eq!(action.timestamp, h.clock.now());

    h.coordinator.flush_backups().await;
    let calls = h.backup.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].kind, BackupKind::Action);
    assert_eq!(calls[0].id, "act-1");
    assert_eq!(calls[0].document["intent"], "call a council");
}

#[tokio::test]
async fn backup_failure_never_fails_the_write() {
    let h = harness().await;
    h.backup.set_failing(true);

    let envelope = h.coordinator.submit_action(submission("p1", "hide")).await;
    assert!(envelope.success);
    h.coordinator.flush_backups().await;

    let warnings = h.coordinator.search_logs("backup of action").data.unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].level, LogLevel::Warn);
}

#[tokio::test]
async fn missing_action_is_successful_and_empty() {
    let h = harness().await;
    let envelope = h.coordinator.get_action("nobody").await;
    assert!(envelope.success);
    assert_eq!(envelope.data, None);
}

#[tokio::test]
async fn update_action_status_parses_status_names() {
    let h = harness().await;
    let id = h
        .coordinator
        .submit_action(submission("p1", "forge a sword"))
        .await
        .data
        .unwrap()
        .id;

    let unknown = h.coordinator.update_action_status(&id, "received", None).await;
    assert!(!unknown.success);
    assert!(unknown.error.unwrap().contains("unknown action status"));

    let illegal = h.coordinator.update_action_status(&id, "completed", None).await;
    assert!(!illegal.success);

    let processing = h
        .coordinator
        .update_action_status(&id, "processing", None)
        .await;
    assert_eq!(processing.data.unwrap().status, ActionStatus::Processing);

    let pending = h.coordinator.get_pending_actions(None).await.data.unwrap();
    assert!(pending.is_empty());
}

#[tokio::test]
async fn world_state_versions_flow_through_coordinator() {
    let h = harness().await;
    let genesis = h.coordinator.get_current_world_state().await.data.unwrap();
    assert_eq!(genesis.version, 1);

    let v1 = h
        .coordinator
        .create_world_state_version(&doc(json!({ "environment": { "weather": "fog" } })))
        .await
        .data
        .unwrap();
    let v2 = h
        .coordinator
        .create_world_state_version(&doc(json!({ "regions": { "millbrook": { "population": 130 } } })))
        .await
        .data
        .unwrap();
    assert_eq!((v1.version, v2.version, v2.previous_version), (1, 2, Some(1)));
    assert_eq!(v2.environment["weather"], "fog");

    let refused = h.coordinator.delete_world_state_version(2).await;
    assert!(!refused.success);
    assert_eq!(h.coordinator.delete_world_state_version(1).await.data, Some(true));

    let history = h
        .coordinator
        .get_world_state_history(&StateQuery::default())
        .await
        .data
        .unwrap();
    assert_eq!(history.len(), 1);

    let region = h.coordinator.get_region_history("millbrook").await.data.unwrap();
    assert_eq!(region[0].entity.population, 130);

    h.coordinator.flush_backups().await;
    let ids: Vec<_> = h.backup.calls().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["v1", "v2"]);
}

#[tokio::test]
async fn action_count_mismatch_is_a_single_issue() {
    let h = harness().await;
    h.coordinator.initialize_world_rules().await;
    let intents = ["light a fire", "steal bread", "mine the ridge"];
    for (n, intent) in intents.into_iter().enumerate() {
        let id = h
            .coordinator
            .submit_action(submission("elder_maren", intent))
            .await
            .data
            .unwrap()
            .id;
        h.coordinator
            .update_action_status(&id, "processing", None)
            .await;
        let done = h
            .coordinator
            .update_action_status(&id, "completed", Some(consequence(&format!("c{n}"))))
            .await;
        assert!(done.success, "{:?}", done.error);
    }
    h.clock.advance(Duration::from_secs(1));
    h.coordinator
        .create_world_state_version(&doc(json!({ "metadata": { "actionCount": 5 } })))
        .await;

    let report = h.coordinator.validate_consistency().await.data.unwrap();
    assert_eq!(report.issue_count(), 1, "{report:?}");
    assert!(report.warnings[0].message.contains('5'));
    assert!(report.warnings[0].message.contains('3'));
    assert_eq!(report.summary.completed_actions, 3);
}

#[tokio::test]
async fn player_without_character_is_inconsistent() {
    let h = harness().await;
    h.coordinator.submit_action(submission("stranger", "wander")).await;
    h.clock.advance(Duration::from_secs(1));
    h.coordinator
        .create_world_state_version(&Document::new())
        .await;

    let report = h.coordinator.validate_consistency().await.data.unwrap();
    assert!(!report.valid);
    assert!(report.errors.iter().any(|e| e.message.contains("stranger")));
}

#[tokio::test]
async fn system_status_reports_stores_and_mirror() {
    let h = harness().await;
    h.coordinator.initialize_world_rules().await;
    h.coordinator.submit_action(submission("p1", "fish")).await;

    let status = h.coordinator.get_system_status().await.data.unwrap();
    assert!(status.healthy);
    assert_eq!(status.stores.blueprint.count, 1);
    assert_eq!(status.stores.actions.count, 1);
    assert_eq!(status.stores.states.count, 0);
    assert_eq!(status.latest_state_version, None);
    assert_eq!(status.mirror.status, MirrorStatus::Healthy);
    assert_eq!(status.mirror_ledger["actions"].mirrored, 1);

    h.mirror.set_failing(true);
    let degraded = h.coordinator.get_system_status().await.data.unwrap();
    assert_eq!(degraded.mirror.status, MirrorStatus::Degraded);
}

#[tokio::test]
async fn mirrored_blobs_can_be_read_back() {
    let h = harness().await;
    let action = h
        .coordinator
        .submit_action(submission("p1", "plant a tree"))
        .await
        .data
        .unwrap();
    let blob_ref = action.metadata.external_mirror_ref.unwrap();

    let blob = h.coordinator.read_mirrored_blob(&blob_ref).await.data.unwrap();
    assert_eq!(blob["intent"], "plant a tree");
    assert!(!h.coordinator.read_mirrored_blob("missing").await.success);
}

#[tokio::test]
async fn demo_snapshot_is_written_to_disk() {
    let h = harness().await;
    h.coordinator.submit_action(submission("elder_maren", "light a fire")).await;

    let snapshot = h.coordinator.create_demo_snapshot().await.data.unwrap();
    assert_eq!(snapshot.actions.len(), 1);
    assert_eq!(snapshot.state.version, 1);
    let path = std::path::PathBuf::from(snapshot.path.clone().unwrap());
    assert!(path.starts_with(h.coordinator.config().data_dir.join(SNAPSHOTS_DIR)));

    let on_disk: DemoSnapshot =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(on_disk.actions, snapshot.actions);
}

#[tokio::test]
async fn logs_can_be_queried_and_exported() {
    let h = harness().await;
    h.coordinator.submit_action(submission("p1", "sing")).await;
    h.coordinator.get_action("../bad").await;

    let recent = h.coordinator.get_recent_logs(50).data.unwrap();
    assert!(recent.iter().any(|e| e.operation == "open"));
    let metrics = h.coordinator.get_performance_metrics().data.unwrap();
    assert!(metrics.contains_key("actions.write"));
    let report = h.coordinator.get_log_report().data.unwrap();
    assert_eq!(report.capacity, 500);

    let path = h.coordinator.export_logs(ExportFormat::Jsonl).data.unwrap();
    assert!(path.ends_with(".jsonl"));
    let lines = std::fs::read_to_string(&path).unwrap();
    assert!(lines.lines().count() >= 2);
}
