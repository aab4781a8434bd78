//! World state specs

use crate::prelude::*;

#[test]
fn transition_creates_next_version() {
    let project = Project::initialized();
    let state = project.json(&[
        "state",
        "transition",
        r#"{"regions":{"millbrook":{"population":200}},"metadata":{"description":"harvest boom"}}"#,
    ]);

    assert_eq!(state["version"], 2);
    assert_eq!(state["previousVersion"], 1);
    assert_eq!(state["regions"]["millbrook"]["population"], 200);
    assert_eq!(state["regions"]["millbrook"]["name"], "Millbrook");
    assert!(project.path().join("states/v2.json").is_file());
}

#[test]
fn transition_reads_modifications_from_file() {
    let project = Project::initialized();
    let path = project.file(
        "mods.json",
        r#"{"environment":{"season":"winter"}}"#,
    );
    let arg = format!("@{}", path.display());

    let state = project.json(&["state", "transition", &arg]);
    assert_eq!(state["environment"]["season"], "winter");
}

#[test]
fn show_serves_latest_and_older_versions() {
    let project = Project::initialized();
    project
        .wk()
        .args(&["state", "transition", r#"{"environment":{"weather":"storm"}}"#])
        .passes();

    project
        .wk()
        .args(&["state", "show"])
        .passes()
        .stdout_has("World state v2 (after v1)");
    project
        .wk()
        .args(&["state", "show", "1"])
        .passes()
        .stdout_has("World state v1");
}

#[test]
fn history_is_newest_first() {
    let project = Project::initialized();
    for season in ["summer", "autumn"] {
        let mods = format!(r#"{{"environment":{{"season":"{season}"}}}}"#);
        project.wk().args(&["state", "transition", &mods]).passes();
    }

    let history = project.json(&["state", "history"]);
    let versions: Vec<u64> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["version"].as_u64().unwrap())
        .collect();
    assert_eq!(versions, vec![3, 2, 1]);

    let oldest = project.json(&["state", "history", "--order", "asc", "--limit", "1"]);
    assert_eq!(oldest[0]["version"], 1);
}

#[test]
fn region_history_tracks_changes() {
    let project = Project::initialized();
    project
        .wk()
        .args(&[
            "state",
            "transition",
            r#"{"regions":{"iron_peaks":{"status":"snowed_in"}}}"#,
        ])
        .passes();

    let history = project.json(&["state", "region", "iron_peaks"]);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["version"], 2);
    assert_eq!(history[0]["entity"]["status"], "snowed_in");
    assert_eq!(history[1]["entity"]["status"], "peaceful");

    project
        .wk()
        .args(&["state", "character", "nobody"])
        .passes()
        .stdout_has("Character 'nobody' appears in no version");
}

#[test]
fn current_version_cannot_be_deleted() {
    let project = Project::initialized();
    project
        .wk()
        .args(&["state", "transition", r#"{"environment":{"weather":"fog"}}"#])
        .passes();

    project
        .wk()
        .args(&["state", "delete", "2"])
        .fails()
        .stderr_has("conflict");
    project
        .wk()
        .args(&["state", "delete", "1"])
        .passes()
        .stdout_has("Deleted world state v1");
    assert!(!project.path().join("states/v1.json").exists());
}

#[test]
fn missing_version_is_not_found() {
    let project = Project::initialized();
    project
        .wk()
        .args(&["state", "show", "7"])
        .fails()
        .stderr_has("not found");
}
