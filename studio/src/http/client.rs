//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::errors::BuilderError;

/// Header carrying the n8n API key
const N8N_API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// Authenticated JSON client for a REST base URL
pub struct HttpClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self, BuilderError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an absolute URL for `path` with query parameters
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, BuilderError> {
        let url = format!("{}{}", self.base_url, path);
        if query.is_empty() {
            Ok(Url::parse(&url)?)
        } else {
            Ok(Url::parse_with_params(&url, query)?)
        }
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        let key = self.api_key.expose_secret();
        self.client
            .request(method, url)
            .header(header::AUTHORIZATION, format!("Bearer {}", key))
            .header(N8N_API_KEY_HEADER, key)
    }

    /// Send a request, turning non-success statuses into errors
    async fn send(&self, request: RequestBuilder, op: &str) -> Result<Response, BuilderError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("{} failed: {} - {}", op, status, body);
            return Err(BuilderError::ApiError(format!(
                "{} failed: {} - {}",
                op, status, body
            )));
        }

        Ok(response)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        op: &str,
    ) -> Result<T, BuilderError> {
        let request = self.request(Method::GET, self.url(path, query)?);
        let response = self.send(request, op).await?;
        Ok(response.json().await?)
    }

    /// Make a GET request and report only whether it succeeded
    pub async fn reachable(&self, path: &str, query: &[(&str, String)]) -> bool {
        let Ok(url) = self.url(path, query) else {
            return false;
        };
        match self.request(Method::GET, url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Probe of {} failed: {}", path, e);
                false
            }
        }
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        op: &str,
    ) -> Result<T, BuilderError> {
        let mut request = self.request(Method::POST, self.url(path, &[])?);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.send(request, op).await?;
        Ok(response.json().await?)
    }

    /// Make a PUT request
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        op: &str,
    ) -> Result<T, BuilderError> {
        let request = self.request(Method::PUT, self.url(path, &[])?).json(body);
        let response = self.send(request, op).await?;
        Ok(response.json().await?)
    }

    /// Make a DELETE request, discarding the response body
    pub async fn delete(&self, path: &str, op: &str) -> Result<(), BuilderError> {
        let request = self.request(Method::DELETE, self.url(path, &[])?);
        self.send(request, op).await?;
        Ok(())
    }
}
