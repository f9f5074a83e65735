//! RAG client configuration.
//!
//! Supports reading connection settings from `~/.config/tutor/secret.json`,
//! falling back to environment variables.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_RAG_URL: &str = "http://localhost:8000";

/// Environment variable holding the backend base URL.
pub const ENV_RAG_URL: &str = "TUTOR_RAG_URL";
/// Environment variable holding the backend API key.
pub const ENV_RAG_API_KEY: &str = "TUTOR_RAG_API_KEY";

/// Root configuration structure for secret.json
#[derive(Debug, Clone, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub rag: Option<RagSecret>,
}

/// RAG backend connection secrets
#[derive(Debug, Clone, Deserialize)]
pub struct RagSecret {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Connection settings for [`crate::RagClient`].
#[derive(Debug, Clone)]
pub struct RagConfig {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,
    /// Optional bearer token sent with every request.
    pub api_key: Option<String>,
    /// Timeout for session management calls.
    pub request_timeout: Duration,
    /// Timeout for RAG query calls. Generous: retrieval plus generation can
    /// take many seconds.
    pub query_timeout: Duration,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RAG_URL.to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(30),
            query_timeout: Duration::from_secs(120),
        }
    }
}

impl RagConfig {
    /// Creates a configuration pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Loads configuration from secret.json or environment variables.
    ///
    /// Priority:
    /// 1. secret.json (`rag.url`, `rag.api_key`)
    /// 2. Environment variables (`TUTOR_RAG_URL`, `TUTOR_RAG_API_KEY`)
    ///
    /// The base URL defaults to `http://localhost:8000` if not specified
    /// anywhere; loading never fails.
    pub fn load() -> Self {
        let secret = match load_secret_config() {
            Ok(config) => config.rag,
            Err(reason) => {
                tracing::debug!("secret.json not used: {}", reason);
                None
            }
        };

        let base_url = secret
            .as_ref()
            .and_then(|rag| rag.url.clone())
            .or_else(|| env::var(ENV_RAG_URL).ok())
            .unwrap_or_else(|| DEFAULT_RAG_URL.to_string());

        let api_key = secret
            .as_ref()
            .and_then(|rag| rag.api_key.clone())
            .or_else(|| env::var(ENV_RAG_API_KEY).ok());

        Self {
            base_url,
            api_key,
            ..Self::default()
        }
    }
}

/// Loads the secret configuration file from ~/.config/tutor/secret.json
pub fn load_secret_config() -> Result<SecretConfig, String> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        return Err(format!(
            "Configuration file not found at: {}",
            config_path.display()
        ));
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        format!(
            "Failed to read configuration file at {}: {}",
            config_path.display(),
            e
        )
    })?;

    serde_json::from_str(&content).map_err(|e| {
        format!(
            "Failed to parse configuration file at {}: {}",
            config_path.display(),
            e
        )
    })
}

/// Returns the path to the configuration file: ~/.config/tutor/secret.json
fn get_config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| "Could not determine home directory".to_string())?;
    Ok(home.join(".config").join("tutor").join("secret.json"))
}
