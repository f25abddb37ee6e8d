//! # Topic Admission Gate (`common::topic_gate`)
//!
//! File: cli/src/common/topic_gate.rs
//!
//! ## Overview
//!
//! Decides whether a conversation is on-topic before anything is sent to the
//! completion provider. Only the most recent user-authored message is
//! inspected; earlier messages and assistant replies never count.
//!
//! Matching is plain case-insensitive substring containment against an
//! allow-list of keywords. There is no tokenization, so `"englishman"` is
//! admitted by the keyword `"english"`.
//!
//! The same gate backs the server's admission check, the client-side
//! `--precheck` flag and `lexis check`.
//!
use super::conversation::{Message, Role};

/// Returns `true` when the last user message contains any allow-list entry.
///
/// A transcript without a user message is never admitted.
pub fn admit(transcript: &[Message], allow_list: &[String]) -> bool {
    match last_user_message(transcript) {
        Some(message) => matches_any(message.content(), allow_list),
        None => false,
    }
}

pub fn last_user_message(transcript: &[Message]) -> Option<&Message> {
    transcript.iter().rev().find(|m| m.role() == Role::User)
}

fn matches_any(text: &str, allow_list: &[String]) -> bool {
    let haystack = text.to_lowercase();
    allow_list
        .iter()
        .any(|topic| haystack.contains(&topic.to_lowercase()))
}

/// The configured allow-list, checked once per request.
#[derive(Debug, Clone)]
pub struct TopicGate {
    topics: Vec<String>,
}

impl TopicGate {
    pub fn new(topics: Vec<String>) -> Self {
        Self { topics }
    }

    pub fn admit(&self, transcript: &[Message]) -> bool {
        admit(transcript, &self.topics)
    }

    /// Checks a single piece of text as if it were the latest user message.
    pub fn admits_text(&self, text: &str) -> bool {
        matches_any(text, &self.topics)
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }
}
