//! Smoke tests for the vitrinador CLI.
//!
//! These exercise the binary's surface without a running storefront: help,
//! listing, group selection errors, and the fatal-transport path against an
//! unreachable system under test.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the vitrinador binary
fn vitrinador() -> Command {
    Command::cargo_bin("vitrinador").expect("vitrinador binary should exist")
}

#[test]
fn version_flag() {
    vitrinador()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.3.0"));
}

#[test]
fn help_flag() {
    vitrinador()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("storefront"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn no_args_requires_a_subcommand() {
    vitrinador().assert().failure();
}

#[test]
fn run_help_documents_group_selection() {
    vitrinador()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--group"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--no-ui"));
}

#[test]
fn list_names_every_group() {
    vitrinador()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("api: authentication"))
        .stdout(predicate::str::contains("api: catalog"))
        .stdout(predicate::str::contains("api: orders"))
        .stdout(predicate::str::contains("api: reviews"))
        .stdout(predicate::str::contains("ui: login page"))
        .stdout(predicate::str::contains("ui: catalog"))
        .stdout(predicate::str::contains("ui: cart"));
}

#[test]
fn unknown_group_is_an_error() {
    vitrinador()
        .args(["run", "--group", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown group"));
}

#[test]
fn unreachable_system_under_test_is_fatal() {
    // Nothing listens on port 9; the first request fails the whole run
    // with a transport error and a non-zero exit.
    vitrinador()
        .args([
            "run",
            "--group",
            "api: authentication",
            "--no-ui",
            "--quiet",
            "--api-url",
            "http://127.0.0.1:9",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Transport"));
}
