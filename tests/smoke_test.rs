//! Smoke tests for the painel CLI.
//!
//! These tests verify basic CLI functionality:
//! - `painel --version` outputs version info
//! - `painel --help` lists the commands
//! - argument errors exit non-zero before touching the network

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_version_flag() {
    TestEnv::new()
        .painel()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("painel"))
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_help_flag() {
    TestEnv::new()
        .painel()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("board"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("update"));
}

#[test]
fn test_add_help_lists_fields() {
    TestEnv::new()
        .painel()
        .args(["add", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--title"))
        .stdout(predicate::str::contains("--platform"))
        .stdout(predicate::str::contains("--due"))
        .stdout(predicate::str::contains("--progress"));
}

#[test]
fn test_add_requires_title_flag() {
    TestEnv::new()
        .painel()
        .args(["add", "--platform", "Instagram"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--title"));
}

#[test]
fn test_unknown_status_rejected() {
    TestEnv::new()
        .painel()
        .args(["list", "--status", "urgent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pending"));
}
