#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a small harbor world definition into a temp directory.
fn test_world() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("harbor.json");
    fs::write(
        &path,
        r#"{
    "name": "Test Harbor",
    "description": "Salt air and gull cries.",
    "start": "dock",
    "entities": [
        { "name": "dock", "kind": "location",
          "description": "Weathered planks run out over grey water." },
        { "name": "shed", "kind": "location",
          "description": "Nets hang from the rafters." },
        { "name": "lantern", "kind": "item", "location": "dock",
          "aliases": ["brass lantern"], "portable": true, "light_source": true },
        { "name": "harbormaster", "kind": "character", "location": "dock",
          "talkable": true }
    ],
    "exits": [
        { "from": "dock", "direction": "north", "to": "shed" },
        { "from": "shed", "direction": "south", "to": "dock" }
    ]
}"#,
    )
    .unwrap();
    (dir, path)
}

fn parlance() -> Command {
    Command::cargo_bin("parlance").unwrap()
}

// ---------------------------------------------------------------------------
// world
// ---------------------------------------------------------------------------

#[test]
fn world_lists_entities_and_totals() {
    let (_dir, path) = test_world();
    parlance()
        .args(["world", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("dock")
                .and(predicate::str::contains("harbormaster"))
                .and(predicate::str::contains("light source"))
                .and(predicate::str::contains("4 entities, 2 exits | start: dock")),
        );
}

#[test]
fn world_json_round_trips() {
    let (_dir, path) = test_world();
    let output = parlance()
        .args(["world", path.to_str().unwrap(), "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON output");
    assert_eq!(json["name"], "Test Harbor");
    assert_eq!(json["entities"].as_array().unwrap().len(), 4);
}

#[test]
fn world_rejects_malformed_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    parlance()
        .args(["world", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid world definition"));
}

#[test]
fn world_rejects_dangling_references() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dangling.json");
    fs::write(
        &path,
        r#"{
    "name": "Broken",
    "start": "dock",
    "entities": [
        { "name": "dock", "kind": "location" },
        { "name": "gull", "kind": "character", "location": "lighthouse" }
    ]
}"#,
    )
    .unwrap();

    parlance()
        .args(["world", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid world definition"));
}

#[test]
fn world_reports_unreadable_files() {
    parlance()
        .args(["world", "no/such/file.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_prints_the_intro_and_each_turn() {
    let (_dir, path) = test_world();
    parlance()
        .args(["run", path.to_str().unwrap(), "look", "north", "--offline"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Salt air and gull cries.")
                .and(predicate::str::contains("Weathered planks run out over grey water."))
                .and(predicate::str::contains("There is a brass lantern here."))
                .and(predicate::str::contains("The harbormaster is here."))
                .and(predicate::str::contains("Nets hang from the rafters.")),
        );
}

#[test]
fn run_offline_shrugs_at_free_text() {
    let (_dir, path) = test_world();
    parlance()
        .args(["run", path.to_str().unwrap(), "polish the dock", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("That would be pointless."));
}

#[test]
fn run_stops_after_a_confirmed_quit() {
    let (_dir, path) = test_world();
    parlance()
        .args(["run", path.to_str().unwrap(), "quit", "y", "north", "--offline"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Do you wish to leave the game?")
                .and(predicate::str::contains("Goodbye."))
                .and(predicate::str::contains("Nets hang from the rafters.").not()),
        );
}

#[test]
fn run_trace_mirrors_the_pipeline_to_stderr() {
    let (_dir, path) = test_world();
    parlance()
        .args(["run", path.to_str().unwrap(), "north", "--offline", "--trace"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[tier] Global"));
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_reads_commands_until_quit() {
    let (_dir, path) = test_world();
    parlance()
        .args(["play", path.to_str().unwrap(), "--offline"])
        .write_stdin("look\nquit\ny\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Salt air and gull cries.")
                .and(predicate::str::contains("Goodbye.")),
        );
}

#[test]
fn play_handles_end_of_input() {
    let (_dir, path) = test_world();
    parlance()
        .args(["play", path.to_str().unwrap(), "--offline"])
        .write_stdin("")
        .assert()
        .success();
}

#[test]
fn play_without_a_key_points_at_offline_mode() {
    let (_dir, path) = test_world();
    parlance()
        .args(["play", path.to_str().unwrap()])
        .env_remove("ANTHROPIC_API_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--offline"));
}
