//! Application orchestration for one upload → synthesize → export cycle.

use crate::ai::{GeminiSynthesisClient, SynthesisService};
use crate::export::{stem_from_name, CodeExport};
use crate::models::{Config, TargetLanguage, UploadedArtifact};
use crate::session::{Session, SessionOptions};
use crate::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Wires the model client into a session and turns results into exports.
pub struct App {
    session: Arc<Session>,
}

impl App {
    /// Build an app from a concrete synthesis service.
    ///
    /// This is primarily useful for integration tests and local harnesses that
    /// need to inject mocks.
    pub fn with_service(service: Arc<dyn SynthesisService>, options: SessionOptions) -> Self {
        Self {
            session: Arc::new(Session::new(service, options)),
        }
    }

    /// Construct an app from already-loaded configuration. The client is
    /// created once here and reused for every cycle.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = GeminiSynthesisClient::from_config(config)?;
        info!(
            "Synthesis provider: Gemini (model: {}, api: {})",
            client.model(),
            config.api_version
        );
        Ok(Self::with_service(Arc::new(client), SessionOptions::from(config)))
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;
        Self::from_config(&config)
    }

    /// Shared handle, e.g. for cancelling from a signal handler.
    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.session)
    }

    /// Load `artifact`, synthesize `lang` code from it and package the result.
    ///
    /// `Ok(None)` means the model found nothing to extract.
    pub async fn run(
        &self,
        artifact: UploadedArtifact,
        lang: TargetLanguage,
    ) -> Result<Option<CodeExport>> {
        let stem = artifact
            .name
            .as_deref()
            .and_then(stem_from_name)
            .map(str::to_string);

        self.session.load(artifact)?;
        let result = self.session.synthesize(lang).await?;

        let export = CodeExport::from_result(&result, stem.as_deref());
        if export.is_none() {
            warn!("No text detected. Try a clearer photo.");
        }
        Ok(export)
    }
}
