//! Data models and structures
//!
//! Defines the artifact, language, request and result types that flow
//! through one upload → synthesize → display cycle, plus the runtime
//! configuration read from the environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Target language for the synthesized code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetLanguage {
    C,
    Java,
    Python,
    #[serde(rename = "C++")]
    Cpp,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 4] = [
        TargetLanguage::C,
        TargetLanguage::Java,
        TargetLanguage::Python,
        TargetLanguage::Cpp,
    ];

    /// Name shown to the user and embedded in the instruction text.
    pub fn display_name(self) -> &'static str {
        match self {
            TargetLanguage::C => "C",
            TargetLanguage::Java => "Java",
            TargetLanguage::Python => "Python",
            TargetLanguage::Cpp => "C++",
        }
    }

    /// Tag used on fenced code blocks for syntax highlighting.
    pub fn fence_tag(self) -> &'static str {
        match self {
            TargetLanguage::C => "c",
            TargetLanguage::Java => "java",
            TargetLanguage::Python => "python",
            TargetLanguage::Cpp => "cpp",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("cpp") {
            return Ok(TargetLanguage::Cpp);
        }
        Self::ALL
            .into_iter()
            .find(|lang| lang.display_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                format!(
                    "Unknown language '{}'. Expected one of: C, Java, Python, C++",
                    s
                )
            })
    }
}

/// A user-supplied image or PDF, read once and held for a single cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedArtifact {
    pub name: Option<String>,
    pub bytes: Vec<u8>,
    pub declared_mime_type: String,
}

impl UploadedArtifact {
    pub fn new(bytes: Vec<u8>, declared_mime_type: impl Into<String>) -> Self {
        Self {
            name: None,
            bytes,
            declared_mime_type: declared_mime_type.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// MIME-tagged binary payload sent alongside the instruction text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Image { bytes: Vec<u8>, mime: String },
    Document { bytes: Vec<u8>, mime: String },
}

impl ContentPart {
    pub fn mime_type(&self) -> &str {
        match self {
            ContentPart::Image { mime, .. } | ContentPart::Document { mime, .. } => mime,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            ContentPart::Image { bytes, .. } | ContentPart::Document { bytes, .. } => bytes,
        }
    }
}

/// One instruction followed by exactly one content part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub instruction_text: String,
    pub content_part: ContentPart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStatus {
    Extracted,
    /// The model returned nothing usable; the scan is probably illegible.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisResult {
    pub text: Option<String>,
    pub language: TargetLanguage,
}

impl SynthesisResult {
    pub fn status(&self) -> ExtractionStatus {
        match self.text {
            Some(_) => ExtractionStatus::Extracted,
            None => ExtractionStatus::Empty,
        }
    }

    pub fn extension(&self) -> &'static str {
        crate::normalizer::derive_extension(self.language)
    }
}

// Configuration
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub model: String,
    pub api_version: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_attempts: usize,
    pub retry_delay: Duration,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| crate::Error::MissingCredential("GEMINI_API_KEY".to_string()))?;

        let timeout_secs = parse_number(&lookup, "SCRIPTOX_TIMEOUT_SECS", 60)?;
        let max_attempts = parse_number(&lookup, "SCRIPTOX_MAX_ATTEMPTS", 1)?;
        let retry_delay_ms = parse_number(&lookup, "SCRIPTOX_RETRY_DELAY_MS", 2000)?;

        if timeout_secs == 0 {
            return Err(crate::Error::Config(
                "SCRIPTOX_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        if max_attempts == 0 {
            return Err(crate::Error::Config(
                "SCRIPTOX_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            gemini_api_key,
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_version: lookup("GEMINI_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            base_url: lookup("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            max_attempts: max_attempts as usize,
            retry_delay: Duration::from_millis(retry_delay_ms),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("gemini_api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

fn parse_number<F>(lookup: &F, key: &str, default: u64) -> crate::Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            crate::Error::Config(format!("{} must be a non-negative integer, got '{}'", key, raw))
        }),
    }
}
