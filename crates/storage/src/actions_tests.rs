// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_fixtures::Fixture;
use proptest::prelude::*;
use std::time::Duration;
use wk_core::model::ActionSortKey;
use wk_core::{ActionSubmission, FakeClock, SequentialIdGen};
use wk_adapters::FakeMirrorAdapter;

type Store = ActionQueueStore<FakeMirrorAdapter, FakeClock, SequentialIdGen>;

fn store(fx: &Fixture) -> Store {
    ActionQueueStore::new(fx.ctx.clone(), SequentialIdGen::new("act"))
}

fn action(fx: &Fixture, player: &str, intent: &str) -> Action {
    Action::from_submission(
        "",
        ActionSubmission {
            player_id: player.to_string(),
            intent: intent.to_string(),
            original_input: String::new(),
            confidence: 0.9,
            parsed_intent: None,
        },
        fx.ctx.clock.now(),
    )
}

fn consequence(id: &str) -> Consequence {
    Consequence {
        id: id.to_string(),
        description: "the bridge collapses".to_string(),
        effects: vec![],
    }
}

#[tokio::test]
async fn write_assigns_id_and_seals() {
    let fx = Fixture::new();
    let store = store(&fx);

    let written = store.write(action(&fx, "p1", "cross the bridge")).await.unwrap();
    assert_eq!(written.id, "act-1");
    assert_eq!(
        written.metadata.verification_hash,
        written.compute_verification_hash()
    );
    assert_eq!(store.read("act-1").await.unwrap(), Some(written));
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn write_keeps_caller_id() {
    let fx = Fixture::new();
    let store = store(&fx);
    let mut a = action(&fx, "p1", "fish");
    a.id = "custom-7".to_string();

    assert_eq!(store.write(a).await.unwrap().id, "custom-7");
    assert!(store.read("custom-7").await.unwrap().is_some());
}

#[tokio::test]
async fn write_rejects_invalid_action() {
    let fx = Fixture::new();
    let store = store(&fx);
    let mut a = action(&fx, "", "");
    a.metadata.confidence = 2.0;

    let err = store.write(a).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(ref e) if e.errors.len() == 3), "{err}");
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn read_missing_is_none_and_unsafe_id_is_rejected() {
    let fx = Fixture::new();
    let store = store(&fx);

    assert_eq!(store.read("nope").await.unwrap(), None);
    assert!(matches!(
        store.read("../escape").await,
        Err(StoreError::Validation(_))
    ));
}

#[tokio::test]
async fn tampered_action_fails_read_and_is_skipped_by_list() {
    let fx = Fixture::new();
    let store = store(&fx);
    store.write(action(&fx, "p1", "dig")).await.unwrap();
    store.write(action(&fx, "p2", "sing")).await.unwrap();

    fx.tamper("actions/act-1.json", |v| v["intent"] = "burn the village".into());

    let err = store.read("act-1").await.unwrap_err();
    assert!(matches!(err, StoreError::Integrity { kind: "action", .. }));

    let listed = store.list(&ActionQuery::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "act-2");
}

#[tokio::test]
async fn status_follows_state_machine() {
    let fx = Fixture::new();
    let store = store(&fx);
    let id = store.write(action(&fx, "p1", "climb")).await.unwrap().id;

    let err = store
        .update_status(&id, ActionStatus::Completed, None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)), "{err}");

    fx.ctx.clock.advance(Duration::from_secs(5));
    let processing = store
        .update_status(&id, ActionStatus::Processing, None)
        .await
        .unwrap();
    assert_eq!(processing.status, ActionStatus::Processing);
    assert_eq!(processing.timestamp, fx.ctx.clock.now());

    let done = store
        .update_status(&id, ActionStatus::Completed, Some(vec![consequence("c1")]))
        .await
        .unwrap();
    assert!(done.has_consequences());
    assert_eq!(store.read(&id).await.unwrap(), Some(done));

    let err = store
        .update_status(&id, ActionStatus::Failed, None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("already completed"), "{err}");
}

#[tokio::test]
async fn update_status_of_missing_action_is_not_found() {
    let fx = Fixture::new();
    let store = store(&fx);
    assert!(matches!(
        store.update_status("ghost", ActionStatus::Processing, None).await,
        Err(StoreError::NotFound { kind: "action", .. })
    ));
}

#[tokio::test]
async fn terminal_actions_cannot_be_deleted() {
    let fx = Fixture::new();
    let store = store(&fx);
    let pending = store.write(action(&fx, "p1", "wait")).await.unwrap().id;
    let failed = store.write(action(&fx, "p1", "jump")).await.unwrap().id;
    store
        .update_status(&failed, ActionStatus::Processing, None)
        .await
        .unwrap();
    store
        .update_status(&failed, ActionStatus::Failed, None)
        .await
        .unwrap();

    assert!(store.delete(&pending).await.unwrap());
    assert!(!store.delete(&pending).await.unwrap());
    assert!(matches!(
        store.delete(&failed).await,
        Err(StoreError::Conflict(_))
    ));
    assert!(store.read(&failed).await.unwrap().is_some());
}

#[tokio::test]
async fn pending_actions_are_oldest_first() {
    let fx = Fixture::new();
    let store = store(&fx);
    for intent in ["first", "second", "third"] {
        store.write(action(&fx, "p1", intent)).await.unwrap();
        fx.ctx.clock.advance(Duration::from_secs(1));
    }
    store
        .update_status("act-2", ActionStatus::Processing, None)
        .await
        .unwrap();

    let pending = store.pending_actions(None).await.unwrap();
    let intents: Vec<_> = pending.iter().map(|a| a.intent.as_str()).collect();
    assert_eq!(intents, ["first", "third"]);
    assert_eq!(store.pending_actions(Some(1)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_sorts_and_paginates() {
    let fx = Fixture::new();
    let store = store(&fx);
    for player in ["carol", "alice", "bob"] {
        store.write(action(&fx, player, "trade")).await.unwrap();
    }
    let query = ActionQuery {
        sort_by: Some(ActionSortKey::PlayerId),
        offset: 1,
        limit: Some(1),
        ..ActionQuery::default()
    };
    let listed = store.list(&query).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].player_id, "bob");
}

#[tokio::test]
async fn mirror_ref_is_recorded_on_action() {
    let fx = Fixture::new();
    let store = store(&fx);
    let written = store.write(action(&fx, "p1", "paint")).await.unwrap();

    let blob_ref = written.metadata.external_mirror_ref.clone().unwrap();
    assert_eq!(
        fx.ctx.ledger.blob_ref(Layer::Actions, &written.id),
        Some(blob_ref.clone())
    );
    let stored = store.read(&written.id).await.unwrap().unwrap();
    assert_eq!(stored.metadata.external_mirror_ref, Some(blob_ref));
}

#[tokio::test]
async fn concurrent_status_updates_allow_one_winner() {
    let fx = Fixture::new();
    let store = store(&fx);
    let id = store.write(action(&fx, "p1", "race")).await.unwrap().id;

    let (a, b) = tokio::join!(
        store.update_status(&id, ActionStatus::Processing, None),
        store.update_status(&id, ActionStatus::Processing, None),
    );
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn player_filter_returns_only_that_player(players in prop::collection::vec(0u8..4, 1..12)) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            let fx = Fixture::new();
            let store = store(&fx);
            for p in &players {
                store.write(action(&fx, &format!("p{p}"), "roam")).await.unwrap();
            }
            let listed = store.list(&ActionQuery::for_player("p0")).await.unwrap();
            let expected = players.iter().filter(|p| **p == 0).count();
            prop_assert_eq!(listed.len(), expected);
            prop_assert!(listed.iter().all(|a| a.player_id == "p0"));
            Ok::<(), TestCaseError>(())
        })?;
    }
}
