use std::path::Path;

pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_PNG: &str = "image/png";
pub const APPLICATION_PDF: &str = "application/pdf";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Declared types the normalizer will forward to the model.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = [IMAGE_JPEG, IMAGE_PNG, APPLICATION_PDF];

pub fn is_accepted(mime: &str) -> bool {
    ACCEPTED_MIME_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(mime))
}

pub fn is_pdf(mime: &str) -> bool {
    mime.eq_ignore_ascii_case(APPLICATION_PDF)
}

/// Declared type for a file, the way a browser upload would label it.
///
/// Formats outside [`ACCEPTED_MIME_TYPES`] are still labelled so the
/// normalizer can reject them by name.
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some(IMAGE_JPEG),
        "png" => Some(IMAGE_PNG),
        "pdf" => Some(APPLICATION_PDF),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

/// Magic-byte detection for files without a recognizable extension.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some(IMAGE_JPEG),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(IMAGE_PNG),
        [0x25, 0x50, 0x44, 0x46, 0x2D, ..] => Some(APPLICATION_PDF),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => {
            tracing::debug!(
                "Unrecognized file signature (first 4 bytes: {:02X?})",
                &bytes[..bytes.len().min(4)]
            );
            None
        }
    }
}
