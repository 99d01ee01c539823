//! File upload surface
//!
//! Reads an artifact from disk and labels it with a declared MIME type the
//! way a browser upload would. Whether that type is acceptable is decided
//! later by the normalizer.

use crate::ai::mime;
use crate::models::UploadedArtifact;
use crate::{Error, Result};
use std::path::Path;

/// Largest payload Gemini accepts as inline data in one request.
pub const MAX_INLINE_BYTES: usize = 20 * 1024 * 1024;

/// Read `path` into an [`UploadedArtifact`].
///
/// The declared type is `mime_override` if given, else derived from the
/// file extension, else sniffed from the leading bytes.
pub async fn read_artifact(path: &Path, mime_override: Option<&str>) -> Result<UploadedArtifact> {
    let bytes = tokio::fs::read(path).await?;

    if bytes.is_empty() {
        return Err(Error::EmptyArtifact);
    }
    if bytes.len() > MAX_INLINE_BYTES {
        return Err(Error::ArtifactTooLarge {
            size: bytes.len(),
            limit: MAX_INLINE_BYTES,
        });
    }

    let declared = declared_mime(path, &bytes, mime_override);
    tracing::debug!(
        "Read {} ({} bytes) declared as {}",
        path.display(),
        bytes.len(),
        declared
    );

    let mut artifact = UploadedArtifact::new(bytes, declared);
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        artifact = artifact.with_name(name);
    }
    Ok(artifact)
}

fn declared_mime(path: &Path, bytes: &[u8], mime_override: Option<&str>) -> String {
    if let Some(declared) = mime_override {
        return declared.trim().to_string();
    }
    mime::mime_from_extension(path)
        .or_else(|| mime::sniff_mime(bytes))
        .unwrap_or(mime::OCTET_STREAM)
        .to_string()
}
