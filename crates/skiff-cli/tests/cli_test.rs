use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn skiff() -> assert_cmd::Command {
    cargo_bin_cmd!("skiff")
}

/// Initialize a git repo with the given files committed.
fn init_git_project(dir: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full = dir.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }

    std::process::Command::new("git")
        .args(["init"])
        .current_dir(dir)
        .output()
        .unwrap();
    std::process::Command::new("git")
        .args(["config", "user.email", "t@t.com"])
        .current_dir(dir)
        .output()
        .unwrap();
    std::process::Command::new("git")
        .args(["config", "user.name", "T"])
        .current_dir(dir)
        .output()
        .unwrap();
    std::process::Command::new("git")
        .args(["add", "."])
        .current_dir(dir)
        .output()
        .unwrap();
    std::process::Command::new("git")
        .args(["commit", "-m", "init"])
        .current_dir(dir)
        .output()
        .unwrap();
}

const PING_MANIFEST: &str = r#"
[v1_ping]
source = "ping.js"
description = "v1 ping test"
role = "arn:aws:iam::000000000000:role/lambda_basic_execution"
"#;

// ── Help / Version ──

#[test]
fn shows_help() {
    skiff()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Package and deploy serverless handlers",
        ));
}

#[test]
fn shows_version() {
    skiff()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skiff"));
}

// ── Handlers Command ──

#[test]
fn handlers_lists_discovered_handlers() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("lib/v1/handlers")).unwrap();
    std::fs::write(
        tmp.path().join("lib/v1/handlers/handlers.toml"),
        PING_MANIFEST,
    )
    .unwrap();
    std::fs::write(tmp.path().join("lib/v1/handlers/ping.js"), "// handler").unwrap();

    skiff()
        .current_dir(tmp.path())
        .arg("handlers")
        .assert()
        .success()
        .stdout(predicate::str::contains("v1_ping"))
        .stdout(predicate::str::contains("v1 ping test"));
}

#[test]
fn handlers_reports_empty_tree() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("lib")).unwrap();

    skiff()
        .current_dir(tmp.path())
        .arg("handlers")
        .assert()
        .success()
        .stdout(predicate::str::contains("No handlers found"));
}

#[test]
fn handlers_fails_on_malformed_manifest() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("lib/handlers")).unwrap();
    // Missing role
    std::fs::write(
        tmp.path().join("lib/handlers/handlers.toml"),
        "[broken]\nsource = \"broken.js\"\ndescription = \"no role\"\n",
    )
    .unwrap();
    std::fs::write(tmp.path().join("lib/handlers/broken.js"), "// handler").unwrap();

    skiff()
        .current_dir(tmp.path())
        .arg("handlers")
        .assert()
        .failure()
        .stderr(predicate::str::contains("handler manifest"));
}

// ── Deploy: Dirty Check ──

#[test]
fn deploy_fails_on_non_git_directory() {
    let tmp = TempDir::new().unwrap();

    skiff()
        .current_dir(tmp.path())
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("git"));
}

#[test]
fn deploy_dirty_repo_blocked_without_flag() {
    let tmp = TempDir::new().unwrap();
    init_git_project(
        tmp.path(),
        &[("skiff.toml", "[project]\nbucket = \"acme-builds\"\n")],
    );

    std::fs::write(tmp.path().join("extra.txt"), "dirty").unwrap();

    skiff()
        .current_dir(tmp.path())
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("uncommitted changes"));
}

// ── Deploy: Config Validation ──

#[test]
fn deploy_fails_without_bucket() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("skiff.toml"), "").unwrap();

    // --allow-dirty skips the git check so config validation is reached
    skiff()
        .current_dir(tmp.path())
        .args(["deploy", "--allow-dirty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bucket"));
}

#[test]
fn deploy_logs_revision_and_stage() {
    let tmp = TempDir::new().unwrap();
    init_git_project(
        tmp.path(),
        &[("skiff.toml", "[project]\nbucket = \"acme-builds\"\n")],
    );

    // Fails later at the missing dist dir, but the deploy start event has
    // already been emitted at info level by then
    skiff()
        .current_dir(tmp.path())
        .arg("deploy")
        .assert()
        .failure()
        .stdout(predicate::str::contains("starting deploy"));
}

// ── Plan: Config Validation ──

#[test]
fn plan_fails_without_bucket() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("skiff.toml"), "").unwrap();

    skiff()
        .current_dir(tmp.path())
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bucket"));
}

#[test]
fn deploy_fails_when_dist_dir_is_missing() {
    let tmp = TempDir::new().unwrap();
    init_git_project(
        tmp.path(),
        &[("skiff.toml", "[project]\nbucket = \"acme-builds\"\n")],
    );

    skiff()
        .current_dir(tmp.path())
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("run your build"));
}
