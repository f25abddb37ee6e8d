//! # Conversation Model (`common::conversation`)
//!
//! File: cli/src/common/conversation/mod.rs
//!
//! Types shared by the server and the terminal client: role-tagged messages,
//! the client-owned transcript, and validated prompt input.

pub mod message;
pub mod prompt;

pub use message::{Message, Role, Transcript};
pub use prompt::PromptInput;
