//! Operation log specs

use crate::prelude::*;

#[test]
fn operations_persist_across_invocations() {
    let project = Project::initialized();
    project
        .wk()
        .args(&["action", "submit", "elder_maren", "sweep the square"])
        .passes();

    project
        .wk()
        .args(&["logs", "recent", "-n", "50"])
        .passes()
        .stdout_has("actions.write")
        .stdout_has("blueprint.write");
    assert!(project.path().join("logs/operations.jsonl").is_file());
}

#[test]
fn search_matches_messages() {
    let project = Project::initialized();
    let out = project.json(&["logs", "search", "rules"]);
    assert!(!out.as_array().unwrap().is_empty());

    project
        .wk()
        .args(&["logs", "search", "zzz-no-such-text"])
        .passes()
        .stdout_has("No operations mention 'zzz-no-such-text'");
}

#[test]
fn failures_show_up_in_report() {
    let project = Project::initialized();
    project
        .wk()
        .args(&["action", "submit", "elder_maren", ""])
        .fails();

    let report = project.json(&["logs", "report"]);
    assert!(report["stats"]["errorRate"].as_f64().unwrap() > 0.0);
    assert!(!report["recentErrors"].as_array().unwrap().is_empty());
}

#[test]
fn export_writes_requested_format() {
    let project = Project::initialized();
    let out = project.json(&["logs", "export", "csv"]);
    let path = out["path"].as_str().unwrap();

    assert!(path.ends_with(".csv"));
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.lines().count() > 1);
}

#[test]
fn diagnostics_go_to_log_file() {
    let project = Project::initialized();
    assert!(project.path().join("logs/wk.log").is_file());
}
