//! # Messages and Transcripts
//!
//! File: cli/src/common/conversation/message.rs
//!
//! ## Overview
//!
//! A `Message` is one role-tagged unit of conversation. A `Transcript` is the
//! ordered list of messages making up one conversation. Both serialize to the
//! wire shape used by `POST /api/ask`:
//!
//! ```json
//! { "role": "user", "content": "Is 'whom' still used in English?" }
//! ```
//!
//! Messages cannot be edited after construction. A transcript only grows by
//! appending, except for `clear`.
//!
use serde::{Deserialize, Serialize};

/// Who authored a message. Replies from the assistant are tagged `System`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered, append-only conversation owned by a single chat session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current messages followed by `next`, for sending.
    pub fn extended_with(&self, next: &Message) -> Vec<Message> {
        let mut out = Vec::with_capacity(self.messages.len() + 1);
        out.extend(self.messages.iter().cloned());
        out.push(next.clone());
        out
    }

    /// Appends a completed exchange. Order is always prompt, then reply.
    pub fn push_exchange(&mut self, prompt: Message, reply: Message) {
        self.messages.push(prompt);
        self.messages.push(reply);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_shape() {
        let json = serde_json::to_string(&Message::user("hello")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hello"}"#);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let parsed: Result<Message, _> =
            serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_missing_content_is_rejected() {
        let parsed: Result<Message, _> = serde_json::from_str(r#"{"role":"user"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_extended_with_leaves_transcript_untouched() {
        let mut transcript = Transcript::new();
        transcript.push_exchange(Message::user("first question"), Message::system("answer"));

        let outgoing = transcript.extended_with(&Message::user("second question"));

        assert_eq!(outgoing.len(), 3);
        assert_eq!(outgoing[2].content(), "second question");
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_push_exchange_keeps_order() {
        let mut transcript = Transcript::new();
        transcript.push_exchange(Message::user("q"), Message::system("a"));

        let roles: Vec<Role> = transcript.messages().iter().map(Message::role).collect();
        assert_eq!(roles, vec![Role::User, Role::System]);
    }

    #[test]
    fn test_clear_always_empties() {
        let mut transcript = Transcript::new();
        for i in 0..5 {
            transcript.push_exchange(Message::user(format!("q{i}")), Message::system("a"));
        }
        transcript.clear();
        assert!(transcript.is_empty());

        // Clearing an empty transcript is a no-op, not an error.
        transcript.clear();
        assert_eq!(transcript.len(), 0);
    }
}
