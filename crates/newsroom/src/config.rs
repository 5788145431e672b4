//! Configuration for the newsroom.
//!
//! Lives under the `[newsroom]` table of the shared Behold TOML file. The API
//! key itself is never stored in the file; it is read from the environment
//! variable named by `api_key_env`.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which backend generates headlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Google Gemini `generateContent` REST API
    #[default]
    Gemini,
    /// OpenAI-compatible chat completions API
    OpenAi,
    /// No backend; every request falls back
    Offline,
}

/// Newsroom settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsroomConfig {
    pub backend: BackendKind,
    /// Base URL of the API, without a trailing slash
    pub api_url: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Deadline for a single headline request
    pub timeout_ms: u64,
}

impl Default for NewsroomConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Gemini,
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key_env: "BEHOLD_API_KEY".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// The slice of the shared config file the newsroom reads.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    newsroom: NewsroomConfig,
}

impl NewsroomConfig {
    /// Loads the `[newsroom]` table from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, NewsroomConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses the `[newsroom]` table from a TOML string. Other tables are
    /// ignored.
    pub fn from_str(content: &str) -> Result<Self, NewsroomConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.newsroom)
    }

    /// The configured API key, if the environment provides a non-empty one.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Backend that will actually be used: a networked backend without an
    /// API key degrades to offline.
    pub fn effective_backend(&self, api_key: Option<&str>) -> BackendKind {
        match (self.backend, api_key) {
            (BackendKind::Offline, _) | (_, None) => BackendKind::Offline,
            (kind, Some(_)) => kind,
        }
    }
}

/// Errors that can occur while loading newsroom configuration.
#[derive(Debug, thiserror::Error)]
pub enum NewsroomConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
