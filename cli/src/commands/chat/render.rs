//! Terminal output for chat sessions.
//!
//! File: cli/src/commands/chat/render.rs
//!
//! Replies are markdown and are printed as-is.
//!
use crate::common::conversation::{Message, Role};
use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;

const EMPTY_TITLE: &str = "How Can I Help You?";
const EMPTY_DESCRIPTION: &str = "Ask me anything or request an essay on any topic!";
const LOADING_FRAMES: [&str; 3] = [".  ", ".. ", "..."];
const LOADING_TICK: Duration = Duration::from_millis(300);

pub fn print_empty_state() {
    println!("\n  {}", EMPTY_TITLE);
    println!("  {}\n", EMPTY_DESCRIPTION);
}

pub fn format_message(message: &Message) -> String {
    match message.role() {
        Role::User => format!("  you ▸ {}", message.content()),
        Role::System => format!("lexis ▸ {}", message.content()),
    }
}

pub fn print_message(message: &Message) {
    println!("{}\n", format_message(message));
}

/// Help line for the input prompt. `/clear` is only offered once there is
/// something to clear.
pub fn input_hint(transcript_len: usize) -> &'static str {
    if transcript_len == 0 {
        "(type a question, /quit to exit)"
    } else {
        "(type a question, /clear to start over, /quit to exit)"
    }
}

pub fn print_input_prompt() {
    print!("› ");
    let _ = io::stdout().flush();
}

/// Drives `fut` to completion while an animated ellipsis runs on stderr.
pub async fn with_loading<F: Future>(fut: F) -> F::Output {
    tokio::pin!(fut);
    let mut ticker = tokio::time::interval(LOADING_TICK);
    let mut frame = 0usize;
    let mut stderr = io::stderr();

    let output = loop {
        tokio::select! {
            output = &mut fut => break output,
            _ = ticker.tick() => {
                let _ = write!(stderr, "\rthinking{}", LOADING_FRAMES[frame % LOADING_FRAMES.len()]);
                let _ = stderr.flush();
                frame += 1;
            }
        }
    };

    let _ = write!(stderr, "\r{}\r", " ".repeat("thinking...".len()));
    let _ = stderr.flush();
    output
}
