//! Tests for error handling, suggestions, and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;

fn stackforge() -> Command {
    Command::cargo_bin("stackforge").unwrap()
}

#[test]
fn conflict_error_carries_suggestions() {
    stackforge()
        .args([
            "new",
            "app",
            "--backend",
            "convex",
            "--database",
            "postgres",
            "--yes",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Incompatible stack selection"))
        .stderr(predicate::str::contains("Suggestions:"))
        .stderr(predicate::str::contains("conflicting flags"));
}

#[test]
fn every_conflict_of_the_generation_is_reported() {
    stackforge()
        .args([
            "new", "app", "--backend", "convex", "--database", "postgres", "--runtime", "node",
            "--yes",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--database postgres"))
        .stderr(predicate::str::contains("--runtime node"));
}

#[test]
fn invalid_project_name_is_rejected() {
    stackforge()
        .args(["new", ".hidden", "--yes"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid project name"));
}

#[test]
fn unsupported_value_lists_nothing_but_fails_cleanly() {
    stackforge()
        .args(["new", "app", "--orm", "hibernate", "--yes"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unsupported value 'hibernate'"));
}

#[test]
fn missing_explicit_config_file_exits_not_found() {
    stackforge()
        .args(["--config", "/definitely/not/here.toml", "list"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn malformed_set_member_is_rejected() {
    stackforge()
        .args(["new", "app", "--frontend", "angular", "--yes"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("angular"));
}

#[test]
fn unknown_config_key_is_a_config_error() {
    stackforge()
        .args(["config", "get", "does.not.exist"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}
