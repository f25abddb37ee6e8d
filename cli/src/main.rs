//! # Lexis Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Lexis is an English-language help assistant. `lexis serve` runs an HTTP
//! endpoint that only forwards English-related conversations to a
//! chat-completion provider; `lexis chat` and `lexis ask` talk to that
//! endpoint from the terminal.
//!
//! This file handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Start the server
//! OPENAI_API_KEY=sk-... lexis serve
//!
//! # Chat with it, logging at debug level
//! lexis -vv chat
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod common;
mod core;

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "lexis",
    about = "📚 Lexis: topic-gated English language help",
    long_about = "Serve and chat with an assistant that only answers questions about the English language.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Run the ask endpoint server.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Start an interactive chat session.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    /// Send a single prompt and print the reply.
    Ask(commands::ask::AskArgs),
    /// Check whether text passes the topic gate.
    Check(commands::check::CheckArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Serve(args) => commands::serve::handle_serve(args).await,
        Commands::Chat(args) => commands::chat::handle_chat(args).await,
        Commands::Ask(args) => commands::ask::handle_ask(args).await,
        Commands::Check(args) => commands::check::handle_check(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
