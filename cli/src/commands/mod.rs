//! # Lexis Commands (`commands`)
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per top-level subcommand. Each exposes a clap argument struct
//! and an async `handle_*` entry point that `main` routes to.
//!
//! - **`serve`**: the topic-gated `POST /api/ask` HTTP server.
//! - **`chat`**: the interactive terminal client holding the transcript.
//! - **`ask`**: one-shot submission for scripts.
//! - **`check`**: local evaluation of the topic gate.
//!

/// One-shot prompt submission (`lexis ask`).
pub mod ask;
/// Interactive chat client (`lexis chat`).
pub mod chat;
/// Local topic gate evaluation (`lexis check`).
pub mod check;
/// Ask endpoint server (`lexis serve`).
pub mod serve;
