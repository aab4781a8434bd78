//! Init, status, check and snapshot specs

use crate::prelude::*;

#[test]
fn init_persists_rules_and_genesis_state() {
    let project = Project::empty();
    project
        .wk()
        .arg("init")
        .passes()
        .stdout_has("Rules: v1.0.0")
        .stdout_has("State: v1 (genesis)");

    assert!(project.path().join("blueprint/world-rules.json").is_file());
    assert!(project.path().join("states/v1.json").is_file());
}

#[test]
fn init_twice_keeps_existing_state() {
    let project = Project::initialized();
    project
        .wk()
        .arg("init")
        .passes()
        .stdout_has("State: v1")
        .stdout_lacks("genesis");
    assert!(!project.path().join("states/v2.json").exists());
}

#[test]
fn status_reports_store_counts() {
    let project = Project::initialized();
    let status = project.json(&["status"]);

    assert_eq!(status["healthy"], true);
    assert_eq!(status["stores"]["blueprint"]["count"], 1);
    assert_eq!(status["stores"]["states"]["count"], 1);
    assert_eq!(status["stores"]["actions"]["count"], 0);
    assert_eq!(status["latestStateVersion"], 1);
    assert_eq!(status["mirror"]["status"], "disabled");
}

#[test]
fn status_on_empty_directory_serves_defaults() {
    let project = Project::empty();
    project
        .wk()
        .arg("status")
        .passes()
        .stdout_has("worldkeep healthy")
        .stdout_has("Latest state: none");
}

#[test]
fn rules_show_lists_builtin_effects() {
    let project = Project::initialized();
    project
        .wk()
        .args(&["rules", "show"])
        .passes()
        .stdout_has("World rules v1.0.0")
        .stdout_has("Butterfly effects: 3")
        .stdout_has("forest_fire");
}

#[test]
fn rules_effects_filters_by_trigger() {
    let project = Project::initialized();
    project
        .wk()
        .args(&["rules", "effects", "STEAL"])
        .passes()
        .stdout_has("market_shortage")
        .stdout_lacks("forest_fire");

    project
        .wk()
        .args(&["rules", "effects", "dance"])
        .passes()
        .stdout_has("No effects triggered by 'dance'");
}

#[test]
fn check_is_consistent_after_init() {
    let project = Project::initialized();
    project
        .wk()
        .args(&["check", "--strict"])
        .passes()
        .stdout_has("Consistency: ok");
}

#[test]
fn strict_check_fails_for_player_without_character() {
    let project = Project::initialized();
    project
        .wk()
        .args(&["action", "submit", "stranger", "knock on the gate"])
        .passes();

    project
        .wk()
        .arg("check")
        .passes()
        .stdout_has("INCONSISTENT")
        .stdout_has("player 'stranger' has no character");
    project
        .wk()
        .args(&["check", "--strict"])
        .fails()
        .stderr_has("world is inconsistent");
}

#[test]
fn tampered_state_fails_integrity_check() {
    let project = Project::initialized();
    let raw = project.read("states/v1.json");
    let mut state: serde_json::Value = serde_json::from_str(&raw).unwrap();
    state["regions"]["millbrook"]["population"] = serde_json::json!(9999);
    project.file("states/v1.json", &state.to_string());

    project
        .wk()
        .args(&["state", "show", "1"])
        .fails()
        .stderr_has("integrity check failed")
        .stderr_has("backups");
}

#[test]
fn snapshot_writes_a_file() {
    let project = Project::initialized();
    let snapshot = project.json(&["snapshot"]);

    let path = snapshot["path"].as_str().unwrap();
    assert!(std::path::Path::new(path).is_file());
    assert!(path.contains("snapshots"));
    assert_eq!(snapshot["state"]["version"], 1);
    assert_eq!(snapshot["consistency"]["valid"], true);
}

#[test]
fn backups_are_written_for_persisted_records() {
    let project = Project::initialized();
    assert!(project.path().join("backups").is_dir());
}
