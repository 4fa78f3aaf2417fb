//! API key and endpoint configuration
//!
//! Stored as one JSON object, read once at startup and replaced wholesale on
//! save. Concurrent writers race with last-write-wins semantics.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::BuilderError;
use crate::filesys::file::File;
use crate::http::platform::{DEFAULT_PLATFORM_URL, PLATFORM_API_PATH};

/// Keys and endpoints for the external services
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Language-model (OpenRouter) API key
    #[serde(default, rename = "openRouterKey")]
    pub openrouter_api_key: String,

    /// Execution platform instance URL (e.g., "http://localhost:5678")
    #[serde(default, rename = "n8nUrl")]
    pub n8n_url: String,

    /// Execution platform API key
    #[serde(default, rename = "n8nApiKey")]
    pub n8n_api_key: String,
}

impl ApiConfig {
    /// Language-model key, if one is set
    pub fn openrouter_key(&self) -> Option<SecretString> {
        non_empty_secret(&self.openrouter_api_key)
    }

    /// Platform key, if one is set
    pub fn n8n_key(&self) -> Option<SecretString> {
        non_empty_secret(&self.n8n_api_key)
    }

    /// Platform API base URL derived from the instance URL, or the local
    /// default when unset
    pub fn platform_url(&self) -> String {
        let url = self.n8n_url.trim().trim_end_matches('/');
        if url.is_empty() {
            DEFAULT_PLATFORM_URL.to_string()
        } else if url.ends_with(PLATFORM_API_PATH) {
            url.to_string()
        } else {
            format!("{}{}", url, PLATFORM_API_PATH)
        }
    }

    /// Same configuration with keys masked, for display
    pub fn redacted(&self) -> Self {
        Self {
            openrouter_api_key: mask(&self.openrouter_api_key),
            n8n_url: self.n8n_url.clone(),
            n8n_api_key: mask(&self.n8n_api_key),
        }
    }
}

impl ApiConfig {
    /// Replace keys that equal the masked form of `current`'s keys with the
    /// real ones, so a redacted configuration can be edited and sent back
    pub fn keep_masked_keys(mut self, current: &ApiConfig) -> Self {
        for (incoming, stored) in [
            (&mut self.openrouter_api_key, &current.openrouter_api_key),
            (&mut self.n8n_api_key, &current.n8n_api_key),
        ] {
            if !stored.is_empty() && *incoming == mask(stored) {
                incoming.clone_from(stored);
            }
        }
        self
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = self.redacted();
        f.debug_struct("ApiConfig")
            .field("openrouter_api_key", &redacted.openrouter_api_key)
            .field("n8n_url", &redacted.n8n_url)
            .field("n8n_api_key", &redacted.n8n_api_key)
            .finish()
    }
}

fn non_empty_secret(value: &str) -> Option<SecretString> {
    let value = value.trim();
    (!value.is_empty()).then(|| SecretString::from(value.to_string()))
}

/// Keep the last four characters of a key
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

/// Load the configuration; a missing file yields an empty configuration
pub async fn load_api_config(config_file: &File) -> Result<ApiConfig, BuilderError> {
    if !config_file.exists().await {
        debug!("No API config at {}", config_file.path().display());
        return Ok(ApiConfig::default());
    }
    config_file.read_json().await.map_err(|e| {
        BuilderError::StorageError(format!(
            "Failed to read {}: {}",
            config_file.path().display(),
            e
        ))
    })
}

/// Overwrite the stored configuration
pub async fn save_api_config(config_file: &File, config: &ApiConfig) -> Result<(), BuilderError> {
    config_file.write_json_private(config).await?;
    info!("Saved API config to {}", config_file.path().display());
    Ok(())
}
