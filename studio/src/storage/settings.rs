//! Settings file management

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::BuilderError;
use crate::filesys::file::File;
use crate::http::completions::DEFAULT_MODEL;
use crate::logs::LogLevel;

/// Process settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Also write JSON logs under the storage directory
    #[serde(default)]
    pub log_to_file: bool,

    /// Local API server configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Language model used for drafting and chat
    #[serde(default = "default_model")]
    pub model: String,

    /// Attribution sent to the completion API
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Application title sent to the completion API
    #[serde(default = "default_app_title")]
    pub app_title: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_site_url() -> String {
    "http://localhost".to_string()
}

fn default_app_title() -> String {
    "Velo Studio Workflow Builder".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_to_file: false,
            server: ServerSettings::default(),
            model: default_model(),
            site_url: default_site_url(),
            app_title: default_app_title(),
        }
    }
}

/// Local API server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Load settings, falling back to defaults when the file does not exist
pub async fn load_settings(settings_file: &File) -> Result<Settings, BuilderError> {
    if !settings_file.exists().await {
        debug!(
            "No settings file at {}, using defaults",
            settings_file.path().display()
        );
        return Ok(Settings::default());
    }
    settings_file.read_json().await
}
