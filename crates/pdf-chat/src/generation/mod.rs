//! Prompt construction and the completion API client

pub mod llm;
pub mod openai;
pub mod prompt;

pub use llm::{ChatMessage, CompletionProvider, CompletionRequest, Role};
pub use openai::OpenAiClient;
pub use prompt::{PromptBuilder, MAX_CONTEXT_CHARS};
