//! # Lexis Ask Server
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! `lexis serve` exposes `POST /api/ask`. Each request carries the whole
//! conversation; the server checks that the latest user message is about
//! English, forwards admitted conversations to the completion provider and
//! returns its reply. Off-topic or malformed requests never reach the
//! provider.
//!
//! ## Architecture
//!
//! - `config.rs`: merges CLI flags with the configuration files
//! - `routes.rs`: request decoding, admission and response mapping
//! - `dispatch.rs`: the pass-through call to the provider
//! - `server_logic.rs`: listener, middleware and graceful shutdown
//!
//! ## Examples
//!
//! ```bash
//! OPENAI_API_KEY=sk-... lexis serve --port 3000
//!
//! curl -s localhost:3000/api/ask \
//!   -H 'content-type: application/json' \
//!   -d '{"messages":[{"role":"user","content":"Explain the English subjunctive"}]}'
//! ```
//!
use crate::core::error::Result;
use tracing::info;

pub use config::ServeArgs;

pub mod config;
pub mod dispatch;
pub mod routes;
pub mod server_logic;

/// Entry point for `lexis serve`.
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);

    let config = config::load_and_merge_config(args)?;
    info!("Effective server config: {:?}", config);

    server_logic::run_server(config).await
}
