//! Chat-completion client for the hosted language model (OpenRouter)

use std::time::Duration;

use async_trait::async_trait;
use openapi_client::models::{ChatCompletionRequest, ChatCompletionResponse, ChatTurn, Usage};
use reqwest::{header, Client};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error};

use crate::errors::BuilderError;

/// Default API base URL
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

/// Sampling settings for one completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: Option<f32>,
}

/// A completion request, independent of the provider's wire format
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model override; the provider default is used when `None`
    pub model: Option<String>,
    pub messages: Vec<ChatTurn>,
    pub sampling: Sampling,
}

/// A completion result
#[derive(Debug, Clone, Default)]
pub struct Completion {
    pub content: String,
    pub model: String,
    pub usage: Usage,
}

/// Source of chat completions
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, BuilderError>;
}

/// Completion client options
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub base_url: String,
    pub model: String,
    /// Sent as `HTTP-Referer` for attribution
    pub site_url: String,
    /// Sent as `X-Title` for attribution
    pub app_title: String,
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            base_url: OPENROUTER_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            site_url: "http://localhost".to_string(),
            app_title: "Velo Studio Workflow Builder".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// OpenAI-compatible chat-completion client
pub struct OpenRouterClient {
    client: Client,
    api_key: SecretString,
    options: CompletionOptions,
}

impl OpenRouterClient {
    /// Create a new client
    pub fn new(api_key: SecretString, options: CompletionOptions) -> Result<Self, BuilderError> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(BuilderError::ConfigError(
                "Missing language-model API key".to_string(),
            ));
        }

        let client = Client::builder().timeout(options.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            options,
        })
    }

    /// Default model identifier
    pub fn model(&self) -> &str {
        &self.options.model
    }

    /// Check that the key is accepted by listing the available models
    pub async fn test_connection(&self) -> bool {
        let url = format!("{}/models", self.options.base_url.trim_end_matches('/'));
        let result = self
            .client
            .get(&url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("HTTP-Referer", &self.options.site_url)
            .send()
            .await;
        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Model listing failed: {}", e);
                false
            }
        }
    }

    fn build_body(&self, request: &CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.options.model.clone()),
            messages: request.messages.clone(),
            temperature: request.sampling.temperature,
            max_tokens: request.sampling.max_tokens,
            top_p: request.sampling.top_p,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, BuilderError> {
        let url = format!(
            "{}/chat/completions",
            self.options.base_url.trim_end_matches('/')
        );
        let body = self.build_body(request);
        debug!("POST {} (model {})", url, body.model);

        let response = self
            .client
            .post(&url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("HTTP-Referer", &self.options.site_url)
            .header("X-Title", &self.options.app_title)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            error!("Completion request failed: {} - {}", status, text);
            return Err(BuilderError::GenerationError(format!(
                "API error: {}",
                status.as_u16()
            )));
        }

        let data: ChatCompletionResponse = response.json().await?;
        let content = data
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(Completion {
            content,
            model: data.model.unwrap_or(body.model),
            usage: data.usage.unwrap_or_default(),
        })
    }
}
