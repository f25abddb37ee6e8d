//! # Lexis Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges and validates the settings shared by `lexis serve`
//! and the terminal client commands. Each command then layers its own CLI
//! flags on top of the result.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.lexis.toml` in current directory or ancestors
//!    (the search stops at a directory containing `.git`)
//! 2. User-specific `config.toml` in the platform config directory
//! 3. Default values defined in the code
//!
//! Each file is read as a `ConfigLayer` whose keys are all optional. Any key a
//! file sets replaces the value from the layers below it, so a project file
//! can override just the fields it cares about, including setting one back
//! to its built-in default.
//!
//! ## Examples
//!
//! ```toml
//! [server]
//! port = 8080
//!
//! [gate]
//! topics = ["english", "grammar"]
//!
//! [provider]
//! model = "gpt-4o-mini"
//! timeout_secs = 60
//!
//! [client]
//! endpoint = "http://127.0.0.1:8080/api/ask"
//! ```
//!
use crate::core::error::{LexisError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use reqwest::Url;
use serde::Deserialize;
use std::{
    fs,
    net::{IpAddr, Ipv4Addr},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

const PROJECT_CONFIG_FILENAME: &str = ".lexis.toml";

/// Persona instruction prepended to every admitted transcript.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an English language expert. Only respond to questions about English language, grammar, vocabulary, or related topics.";

/// The effective configuration after all layers have been applied.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    pub server: ServerSection,
    pub gate: GateSection,
    pub provider: ProviderSection,
    pub client: ClientSection,
}

/// Where `lexis serve` listens.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSection {
    pub host: IpAddr,
    pub port: u16,
    pub enable_cors: bool,
}

/// Topic admission settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GateSection {
    /// Allow-list of topic keywords, matched as case-insensitive substrings.
    pub topics: Vec<String>,
}

/// The upstream chat-completion provider (OpenAI-compatible).
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSection {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub system_prompt: String,
    /// Unset means provider calls may wait indefinitely.
    pub timeout_secs: Option<u64>,
}

/// Settings for `lexis chat` / `lexis ask`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSection {
    pub endpoint: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            enable_cors: true,
        }
    }
}

impl Default for GateSection {
    fn default() -> Self {
        Self {
            topics: vec!["english".to_string()],
        }
    }
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:3000/api/ask".to_string(),
        }
    }
}

/// One configuration file as written on disk. Every key is optional; a key
/// that is present overrides the layers below it, even when it repeats the
/// built-in default.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    #[serde(default)]
    pub server: ServerLayer,
    #[serde(default)]
    pub gate: GateLayer,
    #[serde(default)]
    pub provider: ProviderLayer,
    #[serde(default)]
    pub client: ClientLayer,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerLayer {
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub enable_cors: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GateLayer {
    pub topics: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProviderLayer {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub system_prompt: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClientLayer {
    pub endpoint: Option<String>,
}

impl Config {
    /// Overwrites every field that `layer` sets.
    fn apply(&mut self, layer: ConfigLayer) {
        let ConfigLayer {
            server,
            gate,
            provider,
            client,
        } = layer;

        if let Some(host) = server.host {
            self.server.host = host;
        }
        if let Some(port) = server.port {
            self.server.port = port;
        }
        if let Some(enable_cors) = server.enable_cors {
            self.server.enable_cors = enable_cors;
        }
        if let Some(topics) = gate.topics {
            self.gate.topics = topics;
        }
        if let Some(base_url) = provider.base_url {
            self.provider.base_url = base_url;
        }
        if let Some(model) = provider.model {
            self.provider.model = model;
        }
        if let Some(api_key_env) = provider.api_key_env {
            self.provider.api_key_env = api_key_env;
        }
        if let Some(system_prompt) = provider.system_prompt {
            self.provider.system_prompt = system_prompt;
        }
        if provider.timeout_secs.is_some() {
            self.provider.timeout_secs = provider.timeout_secs;
        }
        if let Some(endpoint) = client.endpoint {
            self.client.endpoint = endpoint;
        }
    }
}

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let project_config = load_project_config(&current_dir)?;
    let merged_config = merge_configs(user_config, project_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigLayer>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Lexis", "lexis") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config(start: &Path) -> Result<Option<ConfigLayer>> {
    if let Some(project_config_path) = find_project_config_path(start) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.lexis.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Applies the user layer and then the project layer over the defaults.
fn merge_configs(user: Option<ConfigLayer>, project: Option<ConfigLayer>) -> Config {
    let mut merged = Config::default();
    for layer in [user, project].into_iter().flatten() {
        merged.apply(layer);
    }
    merged
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if config.gate.topics.is_empty() {
        return Err(anyhow!(LexisError::Config(
            "gate.topics must list at least one topic keyword.".to_string()
        )));
    }
    if config.gate.topics.iter().any(|t| t.trim().is_empty()) {
        // An empty keyword is a substring of every prompt and would admit everything.
        return Err(anyhow!(LexisError::Config(
            "gate.topics must not contain empty keywords.".to_string()
        )));
    }
    for (key, url) in [
        ("provider.base_url", &config.provider.base_url),
        ("client.endpoint", &config.client.endpoint),
    ] {
        validate_http_url(key, url)?;
    }
    if config.provider.model.trim().is_empty() {
        return Err(anyhow!(LexisError::Config(
            "provider.model must not be empty.".to_string()
        )));
    }
    if config.provider.timeout_secs == Some(0) {
        return Err(anyhow!(LexisError::Config(
            "provider.timeout_secs must be greater than zero when set.".to_string()
        )));
    }
    info!("Configuration validation successful.");
    Ok(())
}

/// Requires an absolute `http`/`https` URL with a host.
fn validate_http_url(key: &str, raw: &str) -> Result<()> {
    let invalid = |reason: String| {
        anyhow!(LexisError::Config(format!(
            "Invalid {}: '{}'. {}",
            key, raw, reason
        )))
    };
    let url = Url::parse(raw).map_err(|e| invalid(format!("Not a valid URL ({}).", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "Expected an http:// or https:// URL, got scheme '{}'.",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("The URL has no host.".to_string()));
    }
    Ok(())
}
