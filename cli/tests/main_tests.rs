//! # Lexis CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Top-level behavior of the `lexis` binary: `--version`, `--help`, the
//! `help` subcommand and argument errors.
//!

mod common;
use common::lexis_cmd;
use predicates::prelude::*;

#[test]
fn test_version_flag() {
    lexis_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_subcommands() {
    lexis_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_help_subcommand_for_serve() {
    lexis_cmd()
        .args(["help", "serve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--no-cors"));
}

#[test]
fn test_missing_subcommand_fails() {
    lexis_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_subcommand_fails() {
    lexis_cmd()
        .arg("translate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
