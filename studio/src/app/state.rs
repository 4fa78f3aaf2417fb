//! Application state management

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

use crate::assistant::AssistantSession;
use crate::drafter::WorkflowDrafter;
use crate::errors::BuilderError;
use crate::filesys::file::File;
use crate::http::completions::{CompletionOptions, CompletionProvider, OpenRouterClient};
use crate::http::platform::{N8nClient, WorkflowPlatform};
use crate::storage::api_config::{load_api_config, save_api_config, ApiConfig};
use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;

/// Clients built from one API configuration
#[derive(Clone, Default)]
pub struct Services {
    /// Language-model client, when a key is configured
    pub completions: Option<Arc<OpenRouterClient>>,

    /// Execution platform client, when a key is configured
    pub platform: Option<Arc<dyn WorkflowPlatform>>,

    /// Drafter using the language model when available
    pub drafter: WorkflowDrafter,
}

impl Services {
    /// Build the clients that `config` has keys for
    pub fn build(config: &ApiConfig, settings: &Settings) -> Result<Self, BuilderError> {
        let completions = match config.openrouter_key() {
            Some(key) => {
                let options = CompletionOptions {
                    model: settings.model.clone(),
                    site_url: settings.site_url.clone(),
                    app_title: settings.app_title.clone(),
                    ..Default::default()
                };
                Some(Arc::new(OpenRouterClient::new(key, options)?))
            }
            None => None,
        };

        let platform: Option<Arc<dyn WorkflowPlatform>> = match config.n8n_key() {
            Some(key) => Some(Arc::new(N8nClient::new(&config.platform_url(), key)?)),
            None => None,
        };

        let drafter = match &completions {
            Some(client) => {
                let provider: Arc<dyn CompletionProvider> = client.clone();
                WorkflowDrafter::with_provider(provider)
            }
            None => WorkflowDrafter::local(),
        };

        Ok(Self {
            completions,
            platform,
            drafter,
        })
    }

    /// Platform client, or a configuration error naming the missing key
    pub fn require_platform(&self) -> Result<Arc<dyn WorkflowPlatform>, BuilderError> {
        self.platform.clone().ok_or_else(|| {
            BuilderError::ConfigError("Execution platform API key is not configured".to_string())
        })
    }

    /// Language-model client, or a configuration error naming the missing key
    pub fn require_completions(&self) -> Result<Arc<OpenRouterClient>, BuilderError> {
        self.completions.clone().ok_or_else(|| {
            BuilderError::ConfigError("Language-model API key is not configured".to_string())
        })
    }
}

/// Main application state
pub struct AppState {
    /// Process settings
    pub settings: Settings,

    /// API configuration file
    pub config_file: File,

    /// Current API configuration
    pub api_config: RwLock<ApiConfig>,

    /// Clients derived from the current configuration
    pub services: RwLock<Services>,

    /// Assistant dialogue, created on first use
    pub assistant: Mutex<Option<AssistantSession>>,
}

impl AppState {
    /// Load the API configuration and build the clients.
    ///
    /// An unreadable configuration file is logged and treated as empty.
    pub async fn init(layout: &StorageLayout, settings: Settings) -> Result<Self, BuilderError> {
        info!("Initializing application state...");

        let config_file = layout.api_config_file();
        let api_config = match load_api_config(&config_file).await {
            Ok(config) => config,
            Err(BuilderError::StorageError(e)) => {
                error!("{}; starting with an empty API configuration", e);
                ApiConfig::default()
            }
            Err(e) => return Err(e),
        };
        Self::from_config(config_file, api_config, settings)
    }

    /// State for an already loaded configuration
    pub fn from_config(
        config_file: File,
        api_config: ApiConfig,
        settings: Settings,
    ) -> Result<Self, BuilderError> {
        let services = Services::build(&api_config, &settings)?;
        if services.completions.is_none() {
            warn!("No language-model key configured; drafts use the keyword parser");
        }
        if services.platform.is_none() {
            warn!("No execution platform key configured; deployment is disabled");
        }

        Ok(Self {
            settings,
            config_file,
            api_config: RwLock::new(api_config),
            services: RwLock::new(services),
            assistant: Mutex::new(None),
        })
    }

    /// Snapshot of the current clients
    pub async fn services(&self) -> Services {
        self.services.read().await.clone()
    }

    /// Replace the configuration, persist it and rebuild the clients.
    ///
    /// The assistant dialogue is dropped because it may belong to the old key.
    pub async fn replace_config(&self, config: ApiConfig) -> Result<(), BuilderError> {
        let services = Services::build(&config, &self.settings)?;
        save_api_config(&self.config_file, &config).await?;

        *self.api_config.write().await = config;
        *self.services.write().await = services;
        *self.assistant.lock().await = None;
        Ok(())
    }
}
