//! # Lexis Interactive Chat
//!
//! File: cli/src/commands/chat/mod.rs
//!
//! ## Overview
//!
//! `lexis chat` opens a conversation with a running `lexis serve` instance.
//! The transcript lives only in this process: it starts empty, grows by one
//! prompt/reply pair per successful question, and is emptied by `/clear`.
//! Lines typed while a reply is pending are discarded, not queued.
//!
//! ## Architecture
//!
//! - `client.rs`: one HTTP request per submission to `POST /api/ask`
//! - `session.rs`: the owned transcript and the submit/clear operations
//! - `render.rs`: banners, message formatting and the loading indicator
//!
//! ## Examples
//!
//! ```bash
//! lexis chat
//! lexis chat --endpoint http://10.0.0.5:3000/api/ask --precheck
//! ```
//!
use crate::common::conversation::PromptInput;
use crate::common::topic_gate::TopicGate;
use crate::core::config::{self, Config};
use crate::core::error::{LexisError, Result};
use clap::{Args, Parser};
use std::future::Future;
use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub mod client;
pub mod render;
pub mod session;

use client::AskClient;
use session::ChatSession;

/// Connection options shared by `chat` and `ask`.
#[derive(Args, Debug, Clone, Default)]
pub struct ClientArgs {
    /// Ask endpoint URL (defaults to `client.endpoint` from the config).
    #[arg(long, short)]
    pub endpoint: Option<String>,

    /// Refuse off-topic prompts locally instead of sending them.
    #[arg(long)]
    pub precheck: bool,
}

#[derive(Parser, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub client: ClientArgs,
}

/// Builds a session from the loaded config and the connection flags.
pub fn build_session(args: &ClientArgs, config: &Config) -> Result<ChatSession> {
    let endpoint = args
        .endpoint
        .as_deref()
        .unwrap_or(&config.client.endpoint);
    let session = ChatSession::new(AskClient::new(endpoint)?);
    Ok(if args.precheck {
        session.with_precheck(TopicGate::new(config.gate.topics.clone()))
    } else {
        session
    })
}

/// Entry point for `lexis chat`.
pub async fn handle_chat(args: ChatArgs) -> Result<()> {
    info!("Handling chat command with args: {:?}", args);
    let config = config::load_config()?;
    let mut session = build_session(&args.client, &config)?;

    println!("Connected to {}", session.endpoint());
    render::print_empty_state();

    let mut lines = spawn_stdin_reader();
    loop {
        println!("{}", render::input_hint(session.transcript().len()));
        render::print_input_prompt();

        let Some(line) = lines.recv().await else {
            break; // EOF
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                if session.transcript().is_empty() {
                    println!("Nothing to clear.\n");
                } else {
                    session.clear();
                    render::print_empty_state();
                }
                continue;
            }
            "" => continue,
            _ => {}
        }

        let prompt = match PromptInput::parse(line) {
            Ok(prompt) => prompt,
            Err(e) => {
                println!("{}\n", e);
                continue;
            }
        };

        let outcome =
            discard_input_while(render::with_loading(session.submit(prompt)), &mut lines).await;
        match outcome {
            Ok(_) => {
                let messages = session.transcript().messages();
                for message in &messages[messages.len().saturating_sub(2)..] {
                    render::print_message(message);
                }
            }
            Err(e) => {
                warn!("Submission failed: {:?}", e);
                eprintln!("Error sending message");
                if let Some(LexisError::Rejected(reason)) = e.downcast_ref::<LexisError>() {
                    eprintln!("  {}", reason);
                } else {
                    eprintln!("  {}", e);
                }
                println!();
            }
        }
    }

    println!("Goodbye.");
    Ok(())
}

/// Reads stdin lines on a dedicated thread. The channel closes at EOF or on
/// a read error.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Drives `fut` to completion, dropping any input lines received meanwhile.
/// Input is closed while a submission is in flight.
async fn discard_input_while<F: Future>(
    fut: F,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> F::Output {
    tokio::pin!(fut);
    loop {
        tokio::select! {
            output = &mut fut => return output,
            Some(line) = input.recv() => {
                debug!("Ignoring input typed while waiting for a reply: {:?}", line);
            }
        }
    }
}
