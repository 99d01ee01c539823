//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    #[error("Client initialization failed: {0}")]
    ClientInitialization(String),

    #[error("Unsupported media type '{0}' (expected image/jpeg, image/png or application/pdf)")]
    UnsupportedMediaType(String),

    #[error("Synthesis failed: {0}")]
    SynthesisCall(String),

    #[error("Synthesis timed out after {0:?}")]
    Timeout(Duration),

    #[error("Synthesis cancelled")]
    Cancelled,

    #[error("A synthesis is already in progress for this session")]
    SynthesisInFlight,

    #[error("No artifact loaded")]
    NoArtifact,

    #[error("Artifact is {size} bytes, above the {limit} byte inline limit")]
    ArtifactTooLarge { size: usize, limit: usize },

    #[error("Artifact is empty")]
    EmptyArtifact,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Folds any model-side failure into [`Error::SynthesisCall`], keeping
    /// timeout and cancellation distinguishable.
    pub fn into_synthesis_failure(self) -> Self {
        match self {
            Error::SynthesisCall(_) | Error::Timeout(_) | Error::Cancelled => self,
            other => Error::SynthesisCall(other.to_string()),
        }
    }

    /// Fatal errors end the session; everything else allows another attempt.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::MissingCredential(_) | Error::ClientInitialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
