//! # Chat Session
//!
//! File: cli/src/commands/chat/session.rs
//!
//! ## Overview
//!
//! A `ChatSession` owns one conversation transcript for as long as the user
//! keeps the session open. Submitting a prompt sends the transcript plus the
//! new user message; only a successful reply changes the transcript, and then
//! always by exactly two messages (prompt, reply).
//!
//! `submit` borrows the session mutably, so a session can never have two
//! submissions in flight at once.
//!
use super::client::AskClient;
use crate::common::conversation::{Message, PromptInput, Transcript};
use crate::common::topic_gate::TopicGate;
use crate::core::error::{LexisError, Result};
use tracing::{debug, info};

/// Shown when the local precheck refuses a prompt.
pub const PRECHECK_REJECTION: &str = "Only educational questions are allowed.";

pub struct ChatSession {
    client: AskClient,
    transcript: Transcript,
    precheck: Option<TopicGate>,
}

impl ChatSession {
    pub fn new(client: AskClient) -> Self {
        Self {
            client,
            transcript: Transcript::new(),
            precheck: None,
        }
    }

    /// Refuse off-topic prompts locally, before contacting the server.
    pub fn with_precheck(mut self, gate: TopicGate) -> Self {
        self.precheck = Some(gate);
        self
    }

    /// Submits one validated prompt and returns the reply message.
    ///
    /// On any failure the transcript is left exactly as it was.
    pub async fn submit(&mut self, prompt: PromptInput) -> Result<Message> {
        let user_message = Message::user(prompt.into_inner());

        if let Some(gate) = &self.precheck {
            if !gate.admits_text(user_message.content()) {
                info!("Prompt refused by local topic precheck");
                return Err(LexisError::Rejected(PRECHECK_REJECTION.to_string()).into());
            }
        }

        let outgoing = self.transcript.extended_with(&user_message);
        let text = self.client.send(&outgoing).await?;

        let reply = Message::system(text);
        self.transcript.push_exchange(user_message, reply.clone());
        debug!("Transcript now holds {} messages", self.transcript.len());
        Ok(reply)
    }

    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::serve::routes::{api_router, AppState, REJECTION_MESSAGE};
    use crate::common::conversation::Role;
    use crate::common::provider::fake::FakeProvider;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    /// Runs the real ask routes against `provider` and returns the endpoint URL.
    async fn spawn_server(provider: Arc<FakeProvider>) -> String {
        let state = Arc::new(AppState {
            provider,
            gate: TopicGate::new(vec!["english".to_string()]),
            system_prompt: "persona".to_string(),
        });
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, api_router(state)).await.unwrap();
        });
        format!("http://{}/api/ask", addr)
    }

    async fn unreachable_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/api/ask", addr)
    }

    fn prompt(text: &str) -> PromptInput {
        PromptInput::parse(text).unwrap()
    }

    #[tokio::test]
    async fn test_admitted_prompt_appends_user_then_system() {
        let provider = Arc::new(FakeProvider::replying("It expresses wishes."));
        let endpoint = spawn_server(provider.clone()).await;
        let mut session = ChatSession::new(AskClient::new(&endpoint).unwrap());

        let reply = session
            .submit(prompt("Explain subjunctive mood in English"))
            .await
            .unwrap();

        assert_eq!(reply.content(), "It expresses wishes.");
        let messages = session.transcript().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::user("Explain subjunctive mood in English"));
        assert_eq!(messages[1].role(), Role::System);
        assert_eq!(messages[1].content(), "It expresses wishes.");
    }

    #[tokio::test]
    async fn test_off_topic_prompt_leaves_transcript_unchanged() {
        let provider = Arc::new(FakeProvider::replying("unused"));
        let endpoint = spawn_server(provider.clone()).await;
        let mut session = ChatSession::new(AskClient::new(&endpoint).unwrap());

        let err = session
            .submit(prompt("What's the capital of France?"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<LexisError>(),
            Some(LexisError::Rejected(msg)) if msg == REJECTION_MESSAGE
        ));
        assert!(session.transcript().is_empty());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_prompt_is_sent_twice() {
        let provider = Arc::new(FakeProvider::replying("Same answer."));
        let endpoint = spawn_server(provider.clone()).await;
        let mut session = ChatSession::new(AskClient::new(&endpoint).unwrap());

        session.submit(prompt("English plural of cactus?")).await.unwrap();
        session.submit(prompt("English plural of cactus?")).await.unwrap();

        assert_eq!(session.transcript().len(), 4);
        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        // Second request carries the first exchange as history.
        assert_eq!(calls[0].len(), 2);
        assert_eq!(calls[1].len(), 4);
    }

    #[tokio::test]
    async fn test_failure_keeps_earlier_history() {
        let provider = Arc::new(FakeProvider::replying("Yes."));
        let endpoint = spawn_server(provider).await;
        let mut session = ChatSession::new(AskClient::new(&endpoint).unwrap());

        session.submit(prompt("Is 'irregardless' English?")).await.unwrap();
        let before = session.transcript().clone();

        assert!(session.submit(prompt("Tell me about Rome")).await.is_err());
        assert_eq!(session.transcript(), &before);
    }

    #[tokio::test]
    async fn test_network_failure_leaves_transcript_unchanged() {
        let endpoint = unreachable_endpoint().await;
        let mut session = ChatSession::new(AskClient::new(&endpoint).unwrap());

        let err = session
            .submit(prompt("English question"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<LexisError>(),
            Some(LexisError::ClientNetwork { .. })
        ));
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_precheck_refuses_without_request() {
        // Nothing listens here, so reaching the network would be a ClientNetwork error.
        let endpoint = unreachable_endpoint().await;
        let mut session = ChatSession::new(AskClient::new(&endpoint).unwrap())
            .with_precheck(TopicGate::new(vec!["english".to_string()]));

        let err = session
            .submit(prompt("Best pizza in Naples"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<LexisError>(),
            Some(LexisError::Rejected(msg)) if msg == PRECHECK_REJECTION
        ));
    }

    #[tokio::test]
    async fn test_clear_empties_transcript() {
        let provider = Arc::new(FakeProvider::replying("ok"));
        let endpoint = spawn_server(provider).await;
        let mut session = ChatSession::new(AskClient::new(&endpoint).unwrap());

        session.submit(prompt("English idiom one")).await.unwrap();
        session.submit(prompt("English idiom two")).await.unwrap();
        session.clear();

        assert!(session.transcript().is_empty());
        assert_eq!(session.endpoint(), endpoint);
    }
}
