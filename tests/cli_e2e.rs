//! End-to-end CLI tests for the chomik-mirror binary.

use assert_cmd::Command;
use predicates::prelude::*;

/// Missing the starting URL exits non-zero with a usage message.
#[test]
fn test_binary_without_url_shows_usage_and_fails() {
    let mut cmd = Command::cargo_bin("chomik-mirror").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

/// --help displays the about text and exits with code 0.
#[test]
fn test_binary_help_displays_about() {
    let mut cmd = Command::cargo_bin("chomik-mirror").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mirror audio files"));
}

/// --version displays the crate name and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("chomik-mirror").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("chomik-mirror"));
}

/// Out-of-range worker counts are rejected before any network traffic.
#[test]
fn test_binary_rejects_invalid_worker_count() {
    let mut cmd = Command::cargo_bin("chomik-mirror").unwrap();
    cmd.args(["-j", "0", "http://example/dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
