//! # Lexis Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types shared by the server and the terminal
//! client. Domain failures that callers need to tell apart are variants of
//! `LexisError`; everything else travels as `anyhow::Error` with context
//! attached at the point of failure.
//!
//! ## Architecture
//!
//! - `LexisError`: a `thiserror` enum covering configuration, validation,
//!   topic admission, provider and client-network failures
//! - `Result<T>`: an alias for `anyhow::Result<T>`
//!
//! The HTTP boundary has its own response-shaped error (`AskError` in
//! `commands::serve::routes`); it never exposes provider details, while
//! `LexisError::Provider` keeps them for operator logs.
//!
//! ## Examples
//!
//! ```text
//! // Downcast to react to a specific failure
//! match session.submit(prompt).await {
//!     Err(e) if matches!(e.downcast_ref::<LexisError>(), Some(LexisError::Rejected(_))) => { ... }
//!     ...
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the Lexis application.
#[derive(Error, Debug)]
pub enum LexisError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before any processing (short prompt, bad transcript).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The server answered with a client-error status and a fixed message.
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Completion provider failed: {0}")]
    Provider(String),

    #[error("Completion provider returned no choices")]
    EmptyCompletion,

    /// The ask endpoint could not be reached or answered with a server error.
    #[error("Could not reach {endpoint}: {reason}")]
    ClientNetwork { endpoint: String, reason: String },

    #[error("Unexpected response from {endpoint}: {reason}")]
    MalformedReply { endpoint: String, reason: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
