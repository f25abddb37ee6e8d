//! # Lexis Server Configuration
//!
//! File: cli/src/commands/serve/config.rs
//!
//! ## Overview
//!
//! This module turns the `lexis serve` arguments plus the loaded
//! configuration files into the single `ServerConfig` the server runs with.
//! Precedence, highest first:
//! 1. Command-line arguments
//! 2. `.lexis.toml` / user `config.toml` (see `core::config`)
//! 3. Built-in defaults
//!
//! ## Examples
//!
//! ```bash
//! # Listen on all interfaces, port 8080, with a different model
//! lexis serve --host 0.0.0.0 --port 8080 --model gpt-4o-mini
//!
//! # Same-origin deployments can drop CORS headers
//! lexis serve --no-cors
//! ```
//!
use crate::core::config::{self, Config, ProviderSection};
use crate::core::error::Result;
use clap::Parser;
use std::net::IpAddr;
use tracing::debug;

/// # Serve Command Arguments (`ServeArgs`)
///
/// Every flag is optional; an omitted flag falls back to the configuration
/// file value and then to the default.
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Network port to listen on (default 3000).
    #[arg(long, short)]
    pub port: Option<u16>,

    /// IP address to bind (default 127.0.0.1; use 0.0.0.0 for all interfaces).
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Do not send CORS headers.
    #[arg(long)]
    pub no_cors: bool,

    /// Completion model requested from the provider.
    #[arg(long, short)]
    pub model: Option<String>,
}

/// # Effective Server Configuration (`ServerConfig`)
///
/// Holds the final settings after merging arguments, files and defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub enable_cors: bool,
    /// Topic allow-list for the admission gate.
    pub topics: Vec<String>,
    pub provider: ProviderSection,
}

/// Loads the configuration files and applies the command-line overrides.
pub fn load_and_merge_config(args: ServeArgs) -> Result<ServerConfig> {
    let file_config = config::load_config()?;
    let effective = ServerConfig::resolve(args, file_config);
    debug!("Resolved server config: {:?}", effective);
    Ok(effective)
}

impl ServerConfig {
    fn resolve(args: ServeArgs, config: Config) -> Self {
        let mut provider = config.provider;
        if let Some(model) = args.model {
            provider.model = model;
        }
        Self {
            host: args.host.unwrap_or(config.server.host),
            port: args.port.unwrap_or(config.server.port),
            // --no-cors can only switch CORS off, never back on.
            enable_cors: config.server.enable_cors && !args.no_cors,
            topics: config.gate.topics,
            provider,
        }
    }
}
