#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tq() -> Command {
    let mut cmd = Command::cargo_bin("tq").unwrap();
    cmd.env_remove("TQ_DATA_DIR")
        .env_remove("TQ_MANIFEST")
        .env_remove("TQ_PLAYER")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// A temp directory holding the sample world under `world/`.
fn sample_world() -> TempDir {
    let parent = TempDir::new().unwrap();
    tq().args(["init", "world"])
        .current_dir(parent.path())
        .assert()
        .success();
    parent
}

fn world_dir(parent: &TempDir) -> String {
    parent.path().join("world").to_str().unwrap().to_string()
}

fn json_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .path()
                .extension()
                .is_some_and(|ext| ext == "json")
        })
        .count()
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_data_directory() {
    let parent = TempDir::new().unwrap();
    tq().args(["init", "world"])
        .current_dir(parent.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created game 'The Hollow Vale'"));

    let world = parent.path().join("world");
    assert!(world.join("plugins.json").exists());
    assert_eq!(json_files(&world.join("games")), 1);
    assert_eq!(json_files(&world.join("realms")), 1);
}

#[test]
fn init_fails_if_dir_exists() {
    let parent = TempDir::new().unwrap();
    std::fs::create_dir(parent.path().join("world")).unwrap();

    tq().args(["init", "world"])
        .current_dir(parent.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ---------------------------------------------------------------------------
// exec
// ---------------------------------------------------------------------------

#[test]
fn exec_prints_envelopes_as_json() {
    let parent = sample_world();
    let output = tq()
        .args(["exec", "-d", &world_dir(&parent), "take short sword"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["error"], false);
    assert_eq!(lines[0]["responseData"]["description"]["action"], "take");
    assert_eq!(
        lines[0]["responseData"]["player"]["inventory"][0]["type"],
        "short sword"
    );
    assert_eq!(lines[1]["responseData"]["description"]["action"], "objectives");
}

#[test]
fn exec_completes_objective() {
    let parent = sample_world();
    tq().args([
        "exec",
        "-d",
        &world_dir(&parent),
        "move east",
        "take coin",
        "take coin",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Objective complete: Acquire item."));
}

#[test]
fn exec_state_is_persisted_between_runs() {
    let parent = sample_world();
    let dir = world_dir(&parent);
    tq().args(["exec", "-d", &dir, "take short sword"])
        .assert()
        .success();

    tq().args(["exec", "-d", &dir, "take short sword"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("There is no short sword."));
}

#[test]
fn exec_unknown_verb_fails() {
    let parent = sample_world();
    tq().args(["exec", "-d", &world_dir(&parent), "dance"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""error":true"#))
        .stderr(predicate::str::contains(r#"I don't know how to "dance"."#));
}

#[test]
fn exec_unknown_player_fails() {
    let parent = sample_world();
    tq().args(["exec", "-d", &world_dir(&parent), "-p", "Mallory", "move north"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("There is no player named Mallory."));
}

#[test]
fn exec_player_from_environment() {
    let parent = sample_world();
    tq().env("TQ_PLAYER", "Mallory")
        .args(["exec", "-d", &world_dir(&parent), "move north"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mallory"));
}

#[test]
fn exec_without_world_fails() {
    let dir = TempDir::new().unwrap();
    tq().args(["exec", "-d", dir.path().to_str().unwrap(), "move north"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open world"));
}

#[test]
fn exec_without_objectives_prints_one_line() {
    let parent = sample_world();
    let output = tq()
        .args([
            "exec",
            "-d",
            &world_dir(&parent),
            "--no-objectives",
            "move north",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().lines().count(), 1);
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

#[test]
fn status_lists_objectives() {
    let parent = sample_world();
    tq().args(["status", "-d", &world_dir(&parent)])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Wanderer")
                .and(predicate::str::contains("Navigate to"))
                .and(predicate::str::contains("Acquire from"))
                .and(predicate::str::contains("0/3 objectives complete")),
        );
}

#[test]
fn status_reflects_progress() {
    let parent = sample_world();
    let dir = world_dir(&parent);
    tq().args(["exec", "-d", &dir, "move northeast", "move northeast"])
        .assert()
        .success();

    tq().args(["status", "-d", &dir])
        .assert()
        .success()
        .stdout(predicate::str::contains("1/3 objectives complete"));
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_reads_commands_from_stdin() {
    let parent = sample_world();
    tq().args(["play", "-d", &world_dir(&parent)])
        .write_stdin("look\ntake short sword\ninventory\nquit\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Hollow Vale")
                .and(predicate::str::contains("Tall grass sways around you."))
                .and(predicate::str::contains("short sword"))
                .and(predicate::str::contains("take meadow")),
        );
}

#[test]
fn play_suggests_verb_for_typo() {
    let parent = sample_world();
    tq().args(["play", "-d", &world_dir(&parent)])
        .write_stdin("fihgt Giant\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Did you mean 'fight'?"));
}
