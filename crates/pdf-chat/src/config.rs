//! Configuration for the PDF chat service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Completion API configuration
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 16MB)
    pub max_upload_size: usize,
    /// Directory uploaded PDFs are written to
    pub upload_dir: PathBuf,
    /// Directory holding index.html and its assets
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
            max_upload_size: 16 * 1024 * 1024, // 16MB
            upload_dir: PathBuf::from("uploads"),
            static_dir: PathBuf::from("static"),
        }
    }
}

/// Completion API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// API key, taken from the environment rather than config files
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Chat model name
    pub model: String,
    /// Maximum tokens in the reply
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

impl ChatConfig {
    /// Load configuration: defaults, then an optional TOML file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
    }

    /// Parse TOML configuration text
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("PDF_CHAT_MODEL") {
            self.llm.model = model;
        }
        if let Some(host) = lookup("PDF_CHAT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PDF_CHAT_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("Invalid PDF_CHAT_PORT '{}': {}", port, e)))?;
        }
        if let Some(dir) = lookup("PDF_CHAT_UPLOAD_DIR") {
            self.server.upload_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("PDF_CHAT_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}
