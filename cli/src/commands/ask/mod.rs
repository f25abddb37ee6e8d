//! # One-shot Ask (`lexis ask`)
//!
//! File: cli/src/commands/ask/mod.rs
//!
//! Submits a single prompt as a fresh conversation and prints the reply to
//! stdout. Useful from scripts; the exit status is non-zero when the prompt
//! is too short, off-topic, or the server cannot be reached.
//!
//! ```bash
//! lexis ask "Is it 'fewer' or 'less' in English?"
//! ```
//!
use super::chat::{build_session, render, ClientArgs};
use crate::common::conversation::PromptInput;
use crate::core::config;
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question to send (at least 4 characters).
    pub prompt: String,

    #[command(flatten)]
    pub client: ClientArgs,
}

pub async fn handle_ask(args: AskArgs) -> Result<()> {
    info!("Handling ask command");
    // Validation happens before configuration or network access.
    let prompt = PromptInput::parse(args.prompt)?;

    let config = config::load_config()?;
    let mut session = build_session(&args.client, &config)?;

    let reply = render::with_loading(session.submit(prompt)).await?;
    println!("{}", reply.content());
    Ok(())
}
