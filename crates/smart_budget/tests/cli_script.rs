use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use std::path::Path;

fn run_script(home: &Path, script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("smart_budget_cli").unwrap();
    cmd.env("SMART_BUDGET_CLI_SCRIPT", "1")
        .env("SMART_BUDGET_HOME", home)
        .env_remove("RUST_LOG")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "add Milk 3.50 need\nadd \"Board game\" 40 nice\nlist\nexit\n",
    )
    .success()
    .stdout(contains("Added `Milk` (3.50 USD) to Need to Have."))
    .stdout(contains("=== Nice to Have ==="))
    .stdout(contains("Board game"));

    let document = home.path().join("data").join("shopping-list.json");
    let json = std::fs::read_to_string(document).unwrap();
    assert!(json.contains("\"Milk\""));
    assert!(json.contains("\"nice\""));
}

#[test]
fn recommendation_walks_tiers_then_price() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "budget 20\nadd A 10 need\nadd B 30 need\nadd C 5 good\nlist\n",
    )
    .success()
    .stdout(contains("Suggested total: 15.00 USD (2 of 3 pending items fit)"))
    .stdout(contains("Deferred: B (30.00 USD)"));
}

#[test]
fn purchases_update_budget_status() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "budget 100\nadd Jacket 85 good\nbuy Jacket\nsummary\n",
    )
    .success()
    .stdout(contains("Purchased `Jacket` for 85.00 USD."))
    .stdout(contains("Approaching budget limit"))
    .stdout(contains("Remaining       15.00 USD"));
}

#[test]
fn undo_restores_deleted_item() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "add Soap 2 good\ndelete Soap\nundo\nlist\n",
    )
    .success()
    .stdout(contains("Undid last delete."))
    .stdout(contains("Soap"));

    let json =
        std::fs::read_to_string(home.path().join("data").join("shopping-list.json")).unwrap();
    assert!(json.contains("\"Soap\""));
}

#[test]
fn dismissed_undo_cannot_be_applied() {
    let home = tempfile::tempdir().unwrap();
    run_script(home.path(), "add Tea 1 nice\ndismiss\nundo\n")
        .success()
        .stdout(contains("Undo dismissed."))
        .stdout(contains("Nothing to undo."));
}

#[test]
fn items_persist_between_sessions() {
    let home = tempfile::tempdir().unwrap();
    run_script(home.path(), "add Rice 4 need\nbudget 50\n").success();
    run_script(home.path(), "list\nbudget\n")
        .success()
        .stdout(contains("Rice"))
        .stdout(contains("Monthly budget: 50.00 USD"));
}

#[test]
fn cross_tier_move_is_ignored() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "add Bread 2 need\nadd Candles 7 nice\nmove Bread Candles\n",
    )
    .success()
    .stdout(contains("Items can only be reordered within a tier"));
}

#[test]
fn invalid_input_is_reported_without_aborting() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "add Ghost -4 need\nadd Lamp 12 luxury\nadd Lamp 12 nice\n",
    )
    .success()
    .stdout(contains("Invalid input"))
    .stdout(contains("Added `Lamp`"));
}

#[test]
fn unknown_command_suggests_closest_match() {
    let home = tempfile::tempdir().unwrap();
    run_script(home.path(), "lsit\n")
        .success()
        .stdout(contains("Unknown command `lsit`"))
        .stdout(contains("Suggestion: `list`?"));
}

#[test]
fn config_changes_are_persisted() {
    let home = tempfile::tempdir().unwrap();
    run_script(home.path(), "config set currency eur\nadd Pasta 1.2 need\n")
        .success()
        .stdout(contains("Configuration updated."))
        .stdout(contains("1.20 EUR"));

    let config =
        std::fs::read_to_string(home.path().join("config").join("config.json")).unwrap();
    assert!(config.contains("\"EUR\""));

    run_script(home.path(), "config set theme dark\n")
        .success()
        .stdout(contains("unknown setting `theme`").and(contains("Configuration updated.").not()));
}
