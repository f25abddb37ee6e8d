//! # Lexis Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces used by every command:
//! - `config`: layered TOML configuration loading, merging and validation
//! - `error`: the `LexisError` enum and the crate-wide `Result` alias
//!
pub mod config;
pub mod error;
