use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part};
use crate::ai::SynthesisService;
use crate::models::{Config, ContentPart, SynthesisRequest};
use crate::Result;
use async_trait::async_trait;
use base64::Engine as _;
use std::time::Duration;

pub struct GeminiSynthesisClient {
    http: GeminiHttpClient,
}

impl GeminiSynthesisClient {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: GeminiHttpClient::new(api_key, model, timeout)?,
        })
    }

    pub fn new_with_client(
        api_key: &str,
        model: &str,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Result<Self> {
        Ok(Self {
            http: GeminiHttpClient::new_with_client(api_key, model, timeout, client)?,
        })
    }

    /// Build a client from validated configuration. Any failure here is a
    /// [`crate::Error::ClientInitialization`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = GeminiHttpClient::new(&config.gemini_api_key, &config.model, config.timeout)?
            .with_base_url(&config.base_url)?
            .with_api_version(&config.api_version);
        Ok(Self { http })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.http = self.http.with_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_api_version(mut self, api_version: &str) -> Self {
        self.http = self.http.with_api_version(api_version);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }

    /// Wire form of a request: one user turn, instruction first, artifact second.
    fn to_wire(request: &SynthesisRequest) -> GenerateContentRequest {
        let inline_data = match &request.content_part {
            ContentPart::Image { bytes, mime } | ContentPart::Document { bytes, mime } => {
                InlineData {
                    mime_type: mime.clone(),
                    data: base64::engine::general_purpose::STANDARD.encode(bytes),
                }
            }
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::Text {
                        text: request.instruction_text.clone(),
                    },
                    Part::InlineData { inline_data },
                ],
            }],
        }
    }
}

#[async_trait]
impl SynthesisService for GeminiSynthesisClient {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Option<String>> {
        tracing::debug!(
            "Sending {} part ({} bytes) to Gemini model {}",
            request.content_part.mime_type(),
            request.content_part.bytes().len(),
            self.model()
        );

        let wire = Self::to_wire(request);
        let response: GenerateContentResponse = self.http.generate_content(&wire).await?;

        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            tracing::warn!("Gemini blocked the request: {}", reason);
        }
        if let Some(reason) = response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            tracing::debug!("Gemini finish reason: {}", reason);
        }

        Ok(response.text())
    }
}
