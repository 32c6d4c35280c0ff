// ABOUTME: Integration tests for the riodeploy CLI commands.
// ABOUTME: Validates --help output and init command behavior.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn riodeploy_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("riodeploy"));
    cmd.env_remove("RIODEPLOY_TEAM");
    cmd
}

#[test]
fn help_shows_commands() {
    riodeploy_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("exec"))
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("pull"))
        .stdout(predicate::str::contains("install"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("riodeploy.yml");

    riodeploy_cmd()
        .current_dir(temp_dir.path())
        .args(["--team", "1234", "init"])
        .assert()
        .success();

    assert!(config_path.exists(), "riodeploy.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("team: 1234"));
    assert!(content.contains("install:"));
}

#[test]
fn init_takes_team_from_environment() {
    let temp_dir = tempfile::tempdir().unwrap();

    riodeploy_cmd()
        .current_dir(temp_dir.path())
        .env("RIODEPLOY_TEAM", "4414")
        .arg("init")
        .assert()
        .success();

    let content = fs::read_to_string(temp_dir.path().join("riodeploy.yml")).unwrap();
    assert!(content.contains("team: 4414"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("riodeploy.yml");

    fs::write(&config_path, "team: 1\n").unwrap();

    riodeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_force_overwrites() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("riodeploy.yml");
    fs::write(&config_path, "team: 1\n").unwrap();

    riodeploy_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--force"])
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("install:"));
}

#[test]
fn install_without_install_section_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("riodeploy.yml"), "team: 1\n").unwrap();

    riodeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing `install` section"));
}

#[test]
fn exec_requires_a_command() {
    riodeploy_cmd().arg("exec").assert().failure();
}

#[test]
fn quiet_and_json_conflict() {
    riodeploy_cmd()
        .args(["--quiet", "--json", "check"])
        .assert()
        .failure();
}
