//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User question; absent and `null` both count as empty
    #[serde(default)]
    pub message: Option<String>,
    /// Sanitized filename returned by a previous upload
    #[serde(default)]
    pub filename: Option<String>,
}

/// Successful chat reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Successful upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    /// Key the extracted text is stored under
    pub filename: String,
    /// Extracted text length in characters
    pub text_length: usize,
}

impl UploadResponse {
    pub fn new(filename: String, text: &str) -> Self {
        Self {
            message: "File uploaded successfully".to_string(),
            filename,
            text_length: text.chars().count(),
        }
    }
}

/// Filenames currently held in the text store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    pub files: Vec<String>,
}

/// Health check body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub documents: usize,
}
