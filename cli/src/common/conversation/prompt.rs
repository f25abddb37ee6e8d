//! Prompt input validation.
//!
//! File: cli/src/common/conversation/prompt.rs
//!
use crate::core::error::LexisError;

/// Prompts shorter than this never leave the client.
pub const MIN_PROMPT_CHARS: usize = 4;

/// A prompt that passed input validation.
///
/// Submitting consumes the value, so the input is gone after every attempt
/// whether the request succeeded or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInput(String);

impl PromptInput {
    /// Validates raw input. Length is counted in characters and the text is
    /// kept exactly as typed.
    pub fn parse(raw: impl Into<String>) -> Result<Self, LexisError> {
        let raw = raw.into();
        let len = raw.chars().count();
        if len < MIN_PROMPT_CHARS {
            return Err(LexisError::Validation(format!(
                "Prompt must contain at least {} characters (got {}).",
                MIN_PROMPT_CHARS, len
            )));
        }
        Ok(Self(raw))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_prompt_rejected() {
        for raw in ["", "a", "abc"] {
            let err = PromptInput::parse(raw).unwrap_err();
            assert!(matches!(err, LexisError::Validation(_)), "{raw:?}");
        }
    }

    #[test]
    fn test_min_length_accepted() {
        assert_eq!(PromptInput::parse("word").unwrap().into_inner(), "word");
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // Three characters, more than four bytes.
        assert!(PromptInput::parse("héé").is_err());
        assert!(PromptInput::parse("héél").is_ok());
    }

    #[test]
    fn test_input_is_not_trimmed() {
        let prompt = PromptInput::parse("  hi").unwrap();
        assert_eq!(prompt.into_inner(), "  hi");
    }
}
