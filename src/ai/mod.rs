//! Model integration for code synthesis
//!
//! Provides the [`SynthesisService`] seam, the Gemini REST implementation
//! behind it, and a scriptable mock for tests and local harnesses.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::GeminiSynthesisClient;
pub use mock::{MockReply, MockSynthesisClient};

use crate::models::SynthesisRequest;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait SynthesisService: Send + Sync {
    /// Send one instruction + artifact pair; `None` means the model returned
    /// no text at all.
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Option<String>>;
}
