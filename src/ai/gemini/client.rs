use super::types::ApiErrorEnvelope;
use crate::models::{DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use crate::{Error, Result};
use reqwest::header::HeaderValue;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Lightweight Gemini REST client.
pub struct GeminiHttpClient {
    client: Client,
    api_key: HeaderValue,
    model: String,
    base_url: String,
    api_version: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example `gemini-2.5-flash`);
    /// a `models/...` prefix is stripped.
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::ClientInitialization(format!("HTTP client: {}", e)))?;
        Self::new_with_client(api_key, model, timeout, client)
    }

    pub fn new_with_client(
        api_key: &str,
        model: &str,
        timeout: Duration,
        client: Client,
    ) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(Error::ClientInitialization("API key is empty".to_string()));
        }
        let mut api_key = HeaderValue::from_str(api_key).map_err(|_| {
            Error::ClientInitialization("API key contains invalid characters".to_string())
        })?;
        api_key.set_sensitive(true);

        let model = model.strip_prefix("models/").unwrap_or(model).trim();
        if model.is_empty() {
            return Err(Error::ClientInitialization("model ID is empty".to_string()));
        }

        Ok(Self {
            client,
            api_key,
            model: model.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout,
        })
    }

    /// Point the client at a different endpoint (proxies, test servers).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| {
            Error::ClientInitialization(format!("invalid base URL '{}': {}", base_url, e))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(Error::ClientInitialization(format!(
                "invalid base URL '{}'",
                base_url
            )));
        }
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_api_version(mut self, api_version: &str) -> Self {
        self.api_version = api_version.trim_matches('/').to_string();
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, self.api_version, self.model
        )
    }

    async fn post_to_url<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        url: String,
        request: &Req,
    ) -> Result<Resp> {
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-goog-api-key", self.api_key.clone())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                Error::SynthesisCall(format!("request to Gemini failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error (status {}): {}", status, error_text);
            return Err(Error::SynthesisCall(format!(
                "Gemini API error (status {}): {}",
                status,
                provider_message(&error_text)
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::SynthesisCall(format!("Failed to parse Gemini response: {}", e))
        })
    }

    /// Calls Gemini's `generateContent` endpoint.
    pub async fn generate_content<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        request: &Req,
    ) -> Result<Resp> {
        self.post_to_url(self.generate_content_url(), request).await
    }
}

/// The `error.message` of a Google API error body, or the raw body.
fn provider_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(ApiErrorEnvelope { error }) => match error.status {
            Some(status) => format!("{}: {}", status, error.message),
            None => error.message,
        },
        Err(_) => body.trim().to_string(),
    }
}
