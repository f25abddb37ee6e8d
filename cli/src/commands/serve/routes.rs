//! # Ask Endpoint Handlers
//!
//! File: cli/src/commands/serve/routes.rs
//!
//! ## Overview
//!
//! `POST /api/ask` accepts `{ "messages": [{ "role", "content" }, ...] }` and
//! always answers with a JSON string body:
//!
//! | Outcome                                   | Status | Body                         |
//! |-------------------------------------------|--------|------------------------------|
//! | `messages` missing, null or empty         | 400    | `"Messages are required"`    |
//! | body not an object or `messages` malformed| 400    | `"Invalid messages payload"` |
//! | latest user message is off-topic          | 400    | fixed rejection text         |
//! | admitted and provider answered            | 200    | provider text                |
//! | provider failed                           | 500    | `"Internal Error"`           |
//!
//! The body is decoded by hand rather than through the `Json` extractor so
//! that every malformed request maps to the same fixed response.
//!
use super::dispatch::dispatch;
use crate::common::conversation::Message;
use crate::common::provider::CompletionProvider;
use crate::common::topic_gate::TopicGate;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{de, Deserialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

pub const REJECTION_MESSAGE: &str =
    "This endpoint only handles English-related requests and questions and essays, texts";

/// Read-only state shared by every request.
pub struct AppState {
    pub provider: Arc<dyn CompletionProvider>,
    pub gate: TopicGate,
    pub system_prompt: String,
}

#[derive(Deserialize)]
struct AskRequest {
    #[serde(default)]
    messages: Option<Vec<Message>>,
}

#[derive(Error, Debug)]
pub enum AskError {
    #[error("Messages are required")]
    MissingMessages,

    #[error("Invalid messages payload")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("{}", REJECTION_MESSAGE)]
    OffTopic,

    /// The cause is for logs only; callers see the fixed text.
    #[error("Internal Error")]
    Internal(anyhow::Error),
}

impl AskError {
    fn status(&self) -> StatusCode {
        match self {
            AskError::MissingMessages | AskError::InvalidPayload(_) | AskError::OffTopic => {
                StatusCode::BAD_REQUEST
            }
            AskError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AskError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_string())).into_response()
    }
}

pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ask", post(ask))
        .route("/api/health", get(health))
        .with_state(state)
}

async fn health() -> Json<&'static str> {
    Json("ok")
}

/// Only a top-level JSON object is a request. serde would otherwise accept
/// the struct in sequence form, e.g. `[]` or `[[...]]`.
fn decode_request(body: &[u8]) -> Result<AskRequest, serde_json::Error> {
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(de::Error::custom("request body must be a JSON object"));
    }
    serde_json::from_value(value)
}

async fn ask(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<String>, AskError> {
    let request = decode_request(&body).map_err(|e| {
        info!("Rejecting malformed ask request: {}", e);
        AskError::InvalidPayload(e)
    })?;

    let messages = match request.messages {
        Some(messages) if !messages.is_empty() => messages,
        _ => return Err(AskError::MissingMessages),
    };

    if !state.gate.admit(&messages) {
        info!(
            "Off-topic request rejected ({} messages in transcript)",
            messages.len()
        );
        return Err(AskError::OffTopic);
    }

    match dispatch(state.provider.as_ref(), &state.system_prompt, &messages).await {
        Ok(text) => Ok(Json(text)),
        Err(e) => {
            error!("Ask request failed during completion dispatch: {:?}", e);
            Err(AskError::Internal(e))
        }
    }
}
