//! # Completion Providers (`common::provider`)
//!
//! File: cli/src/common/provider/mod.rs
//!
//! ## Overview
//!
//! The server talks to the upstream language model only through the
//! `CompletionProvider` trait, so request handling can be exercised with an
//! in-process fake while production uses the OpenAI-compatible HTTP client in
//! `openai.rs`.
//!
//! A provider receives the complete ordered message list (system instruction
//! included) and returns the text of the first completion.
//!
use crate::common::conversation::Message;
use crate::core::error::Result;
use async_trait::async_trait;

pub mod openai;

pub use openai::OpenAiClient;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    async fn complete(&self, messages: &[Message]) -> Result<String>;
}
