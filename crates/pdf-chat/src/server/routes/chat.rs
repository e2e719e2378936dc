//! Question answering endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse};

pub const NO_MESSAGE: &str = "No message provided";
pub const NO_DOCUMENT: &str = "No PDF file loaded. Please upload a PDF first.";

/// POST /chat - Ask a question about an uploaded document
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let message = request.message.unwrap_or_default();
    let filename = request.filename.unwrap_or_default();

    if message.is_empty() {
        return Err(Error::invalid_input(NO_MESSAGE));
    }

    let text = Some(filename.as_str())
        .filter(|name| !name.is_empty())
        .and_then(|name| state.store().get(name))
        .ok_or_else(|| Error::invalid_input(NO_DOCUMENT))?;

    let start = Instant::now();
    tracing::info!("Question about '{}': \"{}\"", filename, message);

    let completion = PromptBuilder::build_request(&text, &message, &state.config().llm);

    let response = state
        .llm()
        .complete(&completion)
        .await
        .map_err(|e| match e {
            Error::Llm(_) => e,
            other => Error::llm(other.to_string()),
        })?;

    tracing::info!(
        "Answered via {} ({}) in {}ms",
        state.llm().name(),
        state.llm().model(),
        start.elapsed().as_millis()
    );

    Ok(Json(ChatResponse { response }))
}
