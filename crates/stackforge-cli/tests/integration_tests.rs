//! Integration tests for stackforge-cli.
//!
//! These drive the real binary end to end: flag parsing, Strict
//! resolution, generation through the manifest port, and the list surface.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn stackforge() -> Command {
    Command::cargo_bin("stackforge").unwrap()
}

#[test]
fn help_flag() {
    stackforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("stackforge"))
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn version_flag() {
    stackforge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn new_command_help_lists_stack_flags() {
    stackforge()
        .args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--backend"))
        .stdout(predicate::str::contains("--database"))
        .stdout(predicate::str::contains("--db-setup"))
        .stdout(predicate::str::contains("--no-install"));
}

#[test]
fn new_project_with_defaults() {
    let temp = TempDir::new().unwrap();

    stackforge()
        .current_dir(temp.path())
        .args(["new", "test-project", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));

    let manifest = temp.path().join("test-project/stackforge.json");
    assert!(manifest.exists());
    let body = std::fs::read_to_string(manifest).unwrap();
    assert!(body.contains("\"backend\": \"hono\""));
}

#[test]
fn new_project_dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();

    stackforge()
        .current_dir(temp.path())
        .args(["new", "test-project", "--database", "postgres", "--dry-run", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(!temp.path().join("test-project").exists());
}

#[test]
fn new_project_already_exists() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("existing-project")).unwrap();

    stackforge()
        .current_dir(temp.path())
        .args(["new", "existing-project", "--yes"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn new_prints_the_reproducible_command() {
    let temp = TempDir::new().unwrap();

    stackforge()
        .current_dir(temp.path())
        .args(["new", "api", "--database", "postgres", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stackforge new api --database postgres --yes"));
}

#[test]
fn new_with_url_prints_a_share_link() {
    let temp = TempDir::new().unwrap();

    stackforge()
        .current_dir(temp.path())
        .args(["new", "app", "--backend", "convex", "--url", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backend=convex"))
        .stdout(predicate::str::contains("database=none"));
}

#[test]
fn conflicting_flags_fail_fast_naming_both() {
    let temp = TempDir::new().unwrap();

    stackforge()
        .current_dir(temp.path())
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
        .stderr(predicate::str::contains("--backend convex"))
        .stderr(predicate::str::contains("--database postgres"));

    assert!(!temp.path().join("app").exists());
}

#[test]
fn workers_with_mongodb_is_a_conflict() {
    let temp = TempDir::new().unwrap();

    stackforge()
        .current_dir(temp.path())
        .args([
            "new", "app", "--runtime", "workers", "--database", "mongodb", "--yes",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--runtime workers"));
}

#[test]
fn db_setup_pulls_inferred_fields_silently() {
    let temp = TempDir::new().unwrap();

    stackforge()
        .current_dir(temp.path())
        .args(["new", "edge", "--db-setup", "d1", "--yes"])
        .assert()
        .success();

    let body = std::fs::read_to_string(temp.path().join("edge/stackforge.json")).unwrap();
    assert!(body.contains("\"runtime\": \"workers\""));
    assert!(body.contains("\"database\": \"sqlite\""));
}

#[test]
fn invalid_value_is_an_argument_error() {
    stackforge()
        .args(["new", "app", "--database", "oracle"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unsupported value 'oracle'"));
}

#[test]
fn quiet_new_emits_nothing_on_stdout() {
    let temp = TempDir::new().unwrap();

    stackforge()
        .current_dir(temp.path())
        .args(["-q", "new", "silent-app", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(temp.path().join("silent-app").exists());
}

#[test]
fn list_shows_option_domains() {
    stackforge()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("backend:"))
        .stdout(predicate::str::contains("hono"))
        .stdout(predicate::str::contains("package-manager:"));
}

#[test]
fn list_marks_options_ruled_out_by_flags() {
    stackforge()
        .args(["list", "--runtime", "workers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✗ mongodb"))
        .stdout(predicate::str::contains("✗ docker"));
}

#[test]
fn list_json_is_parseable() {
    let output = stackforge()
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let backends = parsed["backend"].as_array().unwrap();
    assert!(
        backends
            .iter()
            .any(|b| b["value"] == "convex" && b["available"] == true)
    );
}

#[test]
fn shell_completions() {
    stackforge()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stackforge"));
}
