pub mod client;
pub mod synthesis;
pub mod types;

pub use client::GeminiHttpClient;
pub use synthesis::GeminiSynthesisClient;
