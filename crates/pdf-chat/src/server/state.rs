//! Application state for the chat server

use std::sync::Arc;

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::generation::{CompletionProvider, OpenAiClient};
use crate::ingestion::{PdfTextExtractor, TextExtractor};
use crate::store::{InMemoryTextStore, TextStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: ChatConfig,
    /// Extracted text by filename
    store: Arc<dyn TextStore>,
    /// PDF text extractor
    extractor: Arc<dyn TextExtractor>,
    /// Completion API client
    llm: Arc<dyn CompletionProvider>,
}

impl AppState {
    /// Create state wired to the in-memory store, pdf-extract and the OpenAI client
    pub fn new(config: ChatConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        std::fs::create_dir_all(&config.server.upload_dir).map_err(|e| {
            Error::Config(format!(
                "Failed to create upload directory {}: {}",
                config.server.upload_dir.display(),
                e
            ))
        })?;
        tracing::info!("Upload directory: {}", config.server.upload_dir.display());

        if config.llm.api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set; chat requests will fail");
        }
        let llm = OpenAiClient::new(&config.llm)?;
        tracing::info!("Completion client initialized (model: {})", config.llm.model);

        Ok(Self::with_components(
            config,
            Arc::new(InMemoryTextStore::new()),
            Arc::new(PdfTextExtractor::new()),
            Arc::new(llm),
        ))
    }

    /// Create state from explicit components
    pub fn with_components(
        config: ChatConfig,
        store: Arc<dyn TextStore>,
        extractor: Arc<dyn TextExtractor>,
        llm: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                extractor,
                llm,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &ChatConfig {
        &self.inner.config
    }

    /// Get the text store
    pub fn store(&self) -> &dyn TextStore {
        self.inner.store.as_ref()
    }

    /// Get the text extractor (owned handle for blocking tasks)
    pub fn extractor(&self) -> Arc<dyn TextExtractor> {
        Arc::clone(&self.inner.extractor)
    }

    /// Get the completion client
    pub fn llm(&self) -> &dyn CompletionProvider {
        self.inner.llm.as_ref()
    }
}
