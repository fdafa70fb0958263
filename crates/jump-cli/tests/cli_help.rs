use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("j")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("add-cwd"))
        .stdout(predicate::str::contains("list-all-keys"))
        .stdout(predicate::str::contains("select"))
        .stdout(predicate::str::contains("prune"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("j")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}

#[test]
fn test_missing_command_exits_one() {
    cargo_bin_cmd!("j").assert().code(1);
}

#[test]
fn test_missing_key_argument_exits_one() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("j")
        .env("J_HOME", dir.path())
        .arg("select")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("KEY"));
}

#[test]
fn test_unknown_command_exits_one() {
    cargo_bin_cmd!("j").arg("teleport").assert().code(1);
}

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("j")
        .env("J_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    cargo_bin_cmd!("j")
        .env("J_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("show_instructions = true"));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "# existing config").unwrap();

    cargo_bin_cmd!("j")
        .env("J_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_broken_config_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "selector = [").unwrap();

    cargo_bin_cmd!("j")
        .env("J_HOME", dir.path())
        .arg("list-all-keys")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("load config"));

    // Config commands still work.
    cargo_bin_cmd!("j")
        .env("J_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success();
}
