//! # OpenAI-compatible Chat Completion Client
//!
//! File: cli/src/common/provider/openai.rs
//!
//! Sends `{ model, messages }` to `{base_url}/chat/completions` and returns
//! the first choice's content verbatim. Any transport error, non-success
//! status, undecodable body or empty choice list is an error; the caller
//! decides how much of it to reveal.
//!
use super::CompletionProvider;
use crate::common::conversation::Message;
use crate::core::config::ProviderSection;
use crate::core::error::{LexisError, Result};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: Option<String>, model: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        })
    }

    /// Builds a client from the `[provider]` section, reading the API key
    /// from the environment variable it names.
    pub fn from_config(section: &ProviderSection) -> Result<Self> {
        let api_key = std::env::var(&section.api_key_env).ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            tracing::warn!(
                "Environment variable {} is not set; provider requests will be unauthenticated.",
                section.api_key_env
            );
        }
        Self::new(
            &section.base_url,
            api_key,
            &section.model,
            section.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
        };
        let url = self.completions_url();
        debug!("Sending {} messages to {} ({})", messages.len(), url, self.model);

        let mut call = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        let response = call
            .send()
            .await
            .map_err(|e| LexisError::Provider(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LexisError::Provider(format!("API error {}: {}", status, text)).into());
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LexisError::Provider(format!("undecodable response: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LexisError::EmptyCompletion.into())
    }
}
