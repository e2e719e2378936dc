//! pdf-chat: ask questions about an uploaded PDF
//!
//! Uploaded PDFs are written to disk, their text is extracted and held in an
//! in-memory store keyed by sanitized filename, and questions are answered by
//! sending the head of that text to an OpenAI-compatible chat completion API.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod server;
pub mod store;
pub mod types;

pub use config::ChatConfig;
pub use error::{Error, Result};
pub use server::{build_router, AppState, ChatServer};
pub use store::{InMemoryTextStore, TextStore};
pub use types::{ChatRequest, ChatResponse, FileListResponse, UploadResponse};
