//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_top_level_commands() {
    let out = cli().arg("--help").passes();
    for command in ["init", "status", "rules", "action", "state", "logs", "snapshot", "check"] {
        assert!(out.stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn action_help_lists_subcommands() {
    cli()
        .args(&["action", "--help"])
        .passes()
        .stdout_has("submit")
        .stdout_has("pending")
        .stdout_has("update");
}

#[test]
fn version_flag_prints_version() {
    cli().arg("--version").passes().stdout_has("wk ");
}
