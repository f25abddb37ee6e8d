//! # Topic Check (`lexis check`)
//!
//! File: cli/src/commands/check/mod.rs
//!
//! Runs the configured topic gate against a piece of text without contacting
//! any server, printing `admitted` or `rejected`. A rejection exits non-zero.
//!
use crate::common::topic_gate::TopicGate;
use crate::core::config;
use crate::core::error::{LexisError, Result};
use clap::Parser;

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Text evaluated as if it were the latest user message.
    pub text: String,
}

pub async fn handle_check(args: CheckArgs) -> Result<()> {
    let config = config::load_config()?;
    let gate = TopicGate::new(config.gate.topics);
    evaluate(&gate, &args.text)
}

fn evaluate(gate: &TopicGate, text: &str) -> Result<()> {
    if gate.admits_text(text) {
        println!("admitted");
        Ok(())
    } else {
        println!("rejected");
        Err(LexisError::Rejected(format!(
            "no allowed topic found (topics: {})",
            gate.topics().join(", ")
        ))
        .into())
    }
}
