//! HTTP client for the ask endpoint.
//!
//! File: cli/src/commands/chat/client.rs
//!
use crate::common::conversation::Message;
use crate::core::error::{LexisError, Result};
use anyhow::Context;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct AskRequest<'a> {
    messages: &'a [Message],
}

/// Posts transcripts to `POST /api/ask`. One call is exactly one request.
#[derive(Clone)]
pub struct AskClient {
    http: Client,
    endpoint: String,
}

impl AskClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the full transcript and returns the reply text.
    ///
    /// Client-error statuses become `LexisError::Rejected` carrying the
    /// server's message; anything else that is not a JSON string reply is a
    /// network or protocol failure.
    pub async fn send(&self, messages: &[Message]) -> Result<String> {
        debug!("Posting {} messages to {}", messages.len(), self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&AskRequest { messages })
            .send()
            .await
            .map_err(|e| LexisError::ClientNetwork {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| LexisError::ClientNetwork {
            endpoint: self.endpoint.clone(),
            reason: format!("failed to read response body: {}", e),
        })?;

        if status.is_success() {
            return serde_json::from_str::<String>(&body).map_err(|e| {
                LexisError::MalformedReply {
                    endpoint: self.endpoint.clone(),
                    reason: format!("expected a JSON string: {}", e),
                }
                .into()
            });
        }

        let message = server_message(&body);
        if status.is_client_error() {
            return Err(LexisError::Rejected(message).into());
        }
        Err(LexisError::ClientNetwork {
            endpoint: self.endpoint.clone(),
            reason: describe_status(status, &message),
        }
        .into())
    }
}

/// Error bodies are JSON strings; fall back to the raw text otherwise.
fn server_message(body: &str) -> String {
    serde_json::from_str::<String>(body).unwrap_or_else(|_| body.trim().to_string())
}

fn describe_status(status: StatusCode, message: &str) -> String {
    if message.is_empty() {
        format!("server answered {}", status)
    } else {
        format!("server answered {}: {}", status, message)
    }
}
