//! Error types for the PDF chat service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected request input (missing file, bad extension, empty message, ...)
    #[error("{0}")]
    InvalidInput(String),

    /// Upload exceeded the configured size cap
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Text extraction failed
    #[error("Failed to extract text from '{filename}': {message}")]
    Extraction { filename: String, message: String },

    /// Completion API error
    #[error("{0}")]
    Llm(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an input validation error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a completion API error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Config(_)
            | Error::Extraction { .. }
            | Error::Llm(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::Http(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field of the response body
    pub fn public_message(&self) -> String {
        match self {
            Error::InvalidInput(msg) | Error::PayloadTooLarge(msg) => msg.clone(),
            // The cause is logged, not returned
            Error::Extraction { .. } => "Failed to extract text from PDF".to_string(),
            Error::Llm(msg) => format!("Error communicating with AI: {}", msg),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Error::Extraction { .. } => tracing::warn!("{}", self),
            _ if status.is_server_error() => tracing::error!("Request failed: {}", self),
            _ => {}
        }

        let body = Json(json!({ "error": self.public_message() }));

        (status, body).into_response()
    }
}
