//! Error reporting specs

use crate::prelude::*;

#[test]
fn unknown_command_fails() {
    cli().arg("teleport").fails().stderr_has("unrecognized subcommand");
}

#[test]
fn missing_action_reports_not_found_with_suggestion() {
    let project = Project::initialized();
    project
        .wk()
        .args(&["action", "show", "nope"])
        .fails()
        .stderr_has("error: action 'nope' not found")
        .stderr_has("suggestions:");
}

#[test]
fn unknown_status_is_rejected() {
    let project = Project::initialized();
    let action = project.json(&["action", "submit", "p1", "gather herbs"]);
    let id = action["id"].as_str().unwrap();

    project
        .wk()
        .args(&["action", "update", id, "exploded"])
        .fails()
        .stderr_has("unknown action status 'exploded'");
}

#[test]
fn malformed_config_is_reported() {
    let project = Project::empty();
    project.file("worldkeep.toml", "logger = [");

    project
        .wk()
        .arg("status")
        .fails()
        .stderr_has("worldkeep.toml");
}

#[test]
fn bad_modifications_json_is_reported() {
    let project = Project::initialized();
    project
        .wk()
        .args(&["state", "transition", "{not json"])
        .fails()
        .stderr_has("error:");
}
