//! Scriptox - turns photos and PDF scans of handwritten source code into
//! clean, downloadable code files.
//!
//! An uploaded artifact is normalized into a multimodal request, sent to a
//! Gemini model for OCR and light syntax repair, and the returned text is
//! packaged for display and download.

pub mod ai;
pub mod app;
pub mod error;
pub mod export;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod session;
pub mod upload;

pub use error::{Error, Result};
