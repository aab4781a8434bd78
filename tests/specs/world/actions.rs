//! Action queue specs

use crate::prelude::*;

fn submit(project: &Project, player: &str, intent: &str) -> String {
    let action = project.json(&["action", "submit", player, intent]);
    action["id"].as_str().unwrap().to_string()
}

#[test]
fn submitted_action_is_pending_and_sealed() {
    let project = Project::initialized();
    let action = project.json(&[
        "action",
        "submit",
        "elder_maren",
        "light a fire",
        "--input",
        "i light a fire by the well",
        "--confidence",
        "0.8",
        "--type",
        "craft",
    ]);

    assert_eq!(action["status"], "pending");
    assert_eq!(action["playerId"], "elder_maren");
    assert_eq!(action["originalInput"], "i light a fire by the well");
    assert_eq!(action["metadata"]["parsedIntent"]["actionType"], "craft");
    assert_eq!(
        action["metadata"]["verificationHash"].as_str().unwrap().len(),
        64
    );

    let id = action["id"].as_str().unwrap();
    assert!(project.path().join(format!("actions/{id}.json")).is_file());
}

#[test]
fn empty_intent_is_rejected() {
    let project = Project::initialized();
    project
        .wk()
        .args(&["action", "submit", "elder_maren", ""])
        .fails()
        .stderr_has("submit_action failed");
}

#[test]
fn action_moves_through_its_lifecycle() {
    let project = Project::initialized();
    let id = submit(&project, "elder_maren", "gather herbs");

    project
        .wk()
        .args(&["action", "update", &id, "processing"])
        .passes()
        .stdout_has("Status: processing");
    project
        .wk()
        .args(&[
            "action",
            "update",
            &id,
            "completed",
            "--consequence",
            "c1=the herb basket is full",
        ])
        .passes()
        .stdout_has("Status: completed")
        .stdout_has("c1: the herb basket is full");

    project
        .wk()
        .args(&["action", "update", &id, "pending"])
        .fails()
        .stderr_has("conflict");
}

#[test]
fn completed_action_cannot_be_deleted() {
    let project = Project::initialized();
    let id = submit(&project, "elder_maren", "mend the fence");
    for status in ["processing", "completed"] {
        project
            .wk()
            .args(&["action", "update", &id, status])
            .passes();
    }

    project
        .wk()
        .args(&["action", "delete", &id])
        .fails()
        .stderr_has("can no longer be deleted");
}

#[test]
fn pending_action_cannot_skip_processing() {
    let project = Project::initialized();
    let id = submit(&project, "elder_maren", "mend the fence");
    project
        .wk()
        .args(&["action", "update", &id, "completed"])
        .fails()
        .stderr_has("conflict");
}

#[test]
fn pending_action_can_be_deleted() {
    let project = Project::initialized();
    let id = submit(&project, "elder_maren", "mend the fence");

    project
        .wk()
        .args(&["action", "delete", &id])
        .passes()
        .stdout_has(&format!("Deleted action {id}"));
    project.wk().args(&["action", "show", &id]).fails();
}

#[test]
fn list_filters_by_player_and_status() {
    let project = Project::initialized();
    let first = submit(&project, "elder_maren", "bake bread");
    submit(&project, "scout_tavin", "scout the ridge");
    for status in ["processing", "failed"] {
        project
            .wk()
            .args(&["action", "update", &first, status])
            .passes();
    }

    let mine = project.json(&["action", "list", "--player", "elder_maren"]);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let pending = project.json(&["action", "list", "--status", "pending"]);
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["playerId"], "scout_tavin");
}

#[test]
fn pending_lists_oldest_first() {
    let project = Project::initialized();
    let first = submit(&project, "elder_maren", "first");
    let second = submit(&project, "elder_maren", "second");

    let pending = project.json(&["action", "pending"]);
    let ids: Vec<&str> = pending
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);

    project
        .wk()
        .args(&["action", "pending", "--limit", "1"])
        .passes()
        .stdout_has(&first)
        .stdout_lacks(&second);
}

#[test]
fn empty_queue_says_so() {
    let project = Project::initialized();
    project
        .wk()
        .args(&["action", "list"])
        .passes()
        .stdout_eq("No actions");
}
