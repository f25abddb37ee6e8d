//! Completion dispatch.
//!
//! File: cli/src/commands/serve/dispatch.rs
//!
//! Runs only after the topic gate admitted the transcript. The transcript is
//! forwarded unchanged behind a single persona instruction and the provider's
//! text comes back untouched.
//!
use crate::common::conversation::Message;
use crate::common::provider::CompletionProvider;
use crate::core::error::Result;
use anyhow::Context;
use tracing::debug;

pub async fn dispatch(
    provider: &dyn CompletionProvider,
    system_prompt: &str,
    transcript: &[Message],
) -> Result<String> {
    let mut outgoing = Vec::with_capacity(transcript.len() + 1);
    outgoing.push(Message::system(system_prompt));
    outgoing.extend_from_slice(transcript);

    debug!(
        "Dispatching {} messages to provider '{}'",
        outgoing.len(),
        provider.name()
    );
    provider
        .complete(&outgoing)
        .await
        .with_context(|| format!("Provider '{}' did not return a completion", provider.name()))
}
