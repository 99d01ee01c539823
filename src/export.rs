//! Download / export surface
//!
//! Packages synthesized code as a plain-text download and as a fenced code
//! view for display.

use crate::models::{SynthesisResult, TargetLanguage};
use crate::Result;
use std::path::{Path, PathBuf};

pub const EXPORT_MIME_TYPE: &str = "text/plain";
pub const DEFAULT_STEM: &str = "synthesized_code";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeExport {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
    pub language: TargetLanguage,
}

impl CodeExport {
    /// Returns `None` when nothing was extracted.
    ///
    /// `stem` is usually the uploaded file's name without its extension.
    pub fn from_result(result: &SynthesisResult, stem: Option<&str>) -> Option<Self> {
        let contents = result.text.clone()?;
        let stem = stem
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STEM);

        Some(Self {
            file_name: format!("{}.{}", stem, result.extension()),
            mime_type: EXPORT_MIME_TYPE,
            contents,
            language: result.language,
        })
    }

    pub async fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, self.contents.as_bytes()).await?;
        tracing::info!("Saved {} code to {}", self.language, path.display());
        Ok(path)
    }

    /// Markdown code view tagged for syntax highlighting.
    pub fn fenced(&self) -> String {
        let body = self.contents.trim_end_matches('\n');
        format!("```{}\n{}\n```", self.language.fence_tag(), body)
    }
}

/// File stem for the download, taken from the uploaded file name.
pub fn stem_from_name(name: &str) -> Option<&str> {
    Path::new(name).file_stem().and_then(|s| s.to_str())
}
