//! # Lexis CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and builds its commands through `lexis_cmd()` or
//! `isolated_cmd()`.
//!

// Not every test file uses every helper.
#![allow(dead_code)]

pub use assert_cmd::Command;
use tempfile::TempDir;

/// # Get Lexis Command (`lexis_cmd`)
///
/// Returns an `assert_cmd::Command` for the `lexis` binary built for this
/// test run.
///
/// ## Panics
/// Panics if the `lexis` binary cannot be found via `Command::cargo_bin`.
pub fn lexis_cmd() -> Command {
    Command::cargo_bin("lexis").expect("Failed to find lexis binary for testing")
}

/// # Isolated Lexis Command (`isolated_cmd`)
///
/// Like `lexis_cmd`, but the process sees `sandbox` as its home, config
/// directory and working directory, so no real user or project
/// configuration is picked up. `sandbox` gets a `.git` marker to stop the
/// upward `.lexis.toml` search.
pub fn isolated_cmd(sandbox: &TempDir) -> Command {
    let root = sandbox.path();
    std::fs::create_dir_all(root.join(".git")).expect("Failed to create .git marker");

    let mut cmd = lexis_cmd();
    cmd.current_dir(root)
        .env("HOME", root)
        .env("XDG_CONFIG_HOME", root.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}
