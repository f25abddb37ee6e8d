//! # Lexis Common Building Blocks (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Pieces shared by the server and the client commands:
//!
//! - **`conversation`**: `Message`, `Transcript` and validated `PromptInput`.
//! - **`topic_gate`**: the keyword admission check applied to the latest user message.
//! - **`provider`**: the `CompletionProvider` trait and the OpenAI-compatible client.
//!

/// Role-tagged messages, transcripts and prompt validation.
pub mod conversation;
/// Completion provider seam and implementations.
pub mod provider;
/// Topic admission gate.
pub mod topic_gate;
