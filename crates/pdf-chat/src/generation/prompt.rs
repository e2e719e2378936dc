//! Prompt templates for document questions

use crate::config::LlmConfig;

use super::llm::{ChatMessage, CompletionRequest};

/// Characters of document text placed in the system prompt
pub const MAX_CONTEXT_CHARS: usize = 4000;

const SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant that answers questions about the following PDF document:";

/// Prompt builder for document questions
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the system turn: fixed instruction plus the head of the document
    pub fn build_system_prompt(document_text: &str) -> String {
        format!(
            "{}\n\n{}",
            SYSTEM_INSTRUCTION,
            truncate_chars(document_text, MAX_CONTEXT_CHARS)
        )
    }

    /// Build the full completion request for a question about a document
    pub fn build_request(
        document_text: &str,
        question: &str,
        config: &LlmConfig,
    ) -> CompletionRequest {
        CompletionRequest {
            messages: vec![
                ChatMessage::system(Self::build_system_prompt(document_text)),
                ChatMessage::user(question),
            ],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Take at most `max_chars` characters, cutting on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
