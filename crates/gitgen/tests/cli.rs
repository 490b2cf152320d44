use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn gitgen() -> Command {
    Command::cargo_bin("gitgen").unwrap()
}

#[test]
fn test_default_generates_three_commits() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("repo");

    gitgen()
        .arg("--dir")
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 3 commits"));

    assert!(dir.join(".git").is_dir());
    assert_eq!(fs::read_to_string(dir.join("test.txt")).unwrap(), "text 3");
}

#[test]
fn test_json_envelope() {
    let temp = tempdir().unwrap();
    let output = gitgen()
        .arg("--dir")
        .arg(temp.path())
        .args(["--commits", "2", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["schema_version"], 1);
    assert_eq!(response["ok"], true);
    assert_eq!(response["data"]["commits"], 2);
    assert_eq!(response["data"]["branch"], "main");
}

#[test]
fn test_yaml_config_file() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("repo.yaml");
    fs::write(
        &config,
        "conf:\n  author: X\nlog:\n  - init\n  - create file a.txt\n  - commit\n  - branch develop\n  - checkout develop\n",
    )
    .unwrap();
    let dir = temp.path().join("repo");

    gitgen()
        .arg("--dir")
        .arg(&dir)
        .arg("--file")
        .arg(&config)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(dir.join("a.txt")).unwrap(), "a.txt");
    assert_eq!(
        fs::read_to_string(dir.join(".git/HEAD")).unwrap(),
        "ref: refs/heads/develop\n"
    );
}

#[test]
fn test_existing_repository_is_rejected() {
    let temp = tempdir().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();

    gitgen()
        .arg("--dir")
        .arg(temp.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("A Git repository already exists"));

    assert!(!temp.path().join("test.txt").exists());
}

#[test]
fn test_invalid_log_reports_line() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("bad.json");
    fs::write(&config, r#"{"log": ["init", "branch"]}"#).unwrap();
    let dir = temp.path().join("repo");

    gitgen()
        .arg("--dir")
        .arg(&dir)
        .arg("--file")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "line 2: \"branch\": missing branch name",
        ));

    assert!(!dir.exists());
}

#[test]
fn test_invalid_log_json_error() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("bad.json");
    fs::write(&config, r#"{"log": ["init", "rebase main"]}"#).unwrap();

    let output = gitgen()
        .arg("--dir")
        .arg(temp.path().join("repo"))
        .arg("--file")
        .arg(&config)
        .arg("--json")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let response: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(response["ok"], false);
    assert_eq!(response["error"]["code"], "invalid_event_log");
    assert_eq!(response["error"]["details"]["line"], 2);
    assert!(response["error"]["details"]["suggestions"].is_array());
}

#[test]
fn test_invalid_log_names_config_file() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("typo.yaml");
    fs::write(&config, "log:\n  - init\n  - commit:\n      mesage: first\n").unwrap();

    gitgen()
        .arg("-d")
        .arg(temp.path().join("repo"))
        .arg("-f")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("typo.yaml: line 2: \"commit\": unknown field `mesage`"));
}

#[test]
fn test_short_flags() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("repo");

    gitgen()
        .arg("-d")
        .arg(&dir)
        .args(["-c", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 5 commits"));

    assert_eq!(fs::read_to_string(dir.join("test.txt")).unwrap(), "text 5");
}

#[test]
fn test_missing_config_file() {
    let temp = tempdir().unwrap();
    gitgen()
        .arg("--file")
        .arg(temp.path().join("nope.yaml"))
        .arg("--dir")
        .arg(temp.path())
        .assert()
        .code(3);
}

#[test]
fn test_dry_run_prints_commands() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("repo.toml");
    fs::write(
        &config,
        "log = [\"init\", \"create file a.txt\", \"commit\", \"tag v1\"]\n",
    )
    .unwrap();
    let dir = temp.path().join("repo");

    let output = gitgen()
        .arg("--dir")
        .arg(&dir)
        .arg("--file")
        .arg(&config)
        .arg("--dry-run")
        .output()
        .unwrap();
    assert!(output.status.success());

    let commands: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        commands,
        serde_json::json!([
            {"init": {"defaultBranch": "main"}},
            {"create file": {"file": "a.txt", "content": "a.txt"}},
            {"commit": {"message": "commit 1", "author": "user-test", "email": "user-test@example.com"}},
            {"tag": {"name": "v1"}}
        ])
    );
    assert!(!dir.exists());
}
