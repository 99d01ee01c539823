//! Request normalization
//!
//! Turns an uploaded artifact and a target language into a model request,
//! and turns the model's raw text back into a result ready for display and
//! download. Everything here is pure; no network or filesystem access.

use crate::ai::mime;
use crate::models::{
    ContentPart, SynthesisRequest, SynthesisResult, TargetLanguage, UploadedArtifact,
};
use crate::{prompts, Error, Result};

/// Build the instruction + content part pair for one artifact.
///
/// Fails with [`Error::UnsupportedMediaType`] for anything other than
/// JPEG, PNG or PDF. The declared MIME string is carried over verbatim.
pub fn build_request(
    artifact: &UploadedArtifact,
    lang: TargetLanguage,
) -> Result<SynthesisRequest> {
    let declared = artifact.declared_mime_type.as_str();

    if !mime::is_accepted(declared) {
        tracing::warn!("Rejecting artifact with declared type '{}'", declared);
        return Err(Error::UnsupportedMediaType(declared.to_string()));
    }

    let content_part = if mime::is_pdf(declared) {
        ContentPart::Document {
            bytes: artifact.bytes.clone(),
            mime: declared.to_string(),
        }
    } else {
        ContentPart::Image {
            bytes: artifact.bytes.clone(),
            mime: declared.to_string(),
        }
    };

    tracing::debug!(
        "Built {} request for {} artifact ({} bytes)",
        lang,
        declared,
        artifact.size_bytes()
    );

    Ok(SynthesisRequest {
        instruction_text: instruction_text(lang),
        content_part,
    })
}

pub fn instruction_text(lang: TargetLanguage) -> String {
    prompts::render(
        prompts::SYNTHESIS_INSTRUCTION,
        &[("lang", lang.display_name())],
    )
    .trim_end()
    .to_string()
}

/// Wrap the model's reply. Absent or whitespace-only text becomes an empty
/// result; anything else passes through untouched.
pub fn interpret_response(raw_text: Option<&str>, lang: TargetLanguage) -> SynthesisResult {
    let text = raw_text
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string);

    SynthesisResult {
        text,
        language: lang,
    }
}

pub fn derive_extension(lang: TargetLanguage) -> &'static str {
    match lang {
        TargetLanguage::C => "c",
        TargetLanguage::Java => "java",
        TargetLanguage::Python => "py",
        TargetLanguage::Cpp => "cpp",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractionStatus;
    use pretty_assertions::assert_eq;

    fn artifact(mime: &str) -> UploadedArtifact {
        UploadedArtifact::new(vec![0xDE, 0xAD, 0xBE, 0xEF], mime)
    }

    #[test]
    fn test_accepted_types_keep_declared_mime() {
        for declared in mime::ACCEPTED_MIME_TYPES {
            let request = build_request(&artifact(declared), TargetLanguage::C).unwrap();
            assert_eq!(request.content_part.mime_type(), declared);
            assert_eq!(request.content_part.bytes(), &[0xDE, 0xAD, 0xBE, 0xEF]);
        }
    }

    #[test]
    fn test_pdf_becomes_document_part() {
        let request = build_request(&artifact("application/pdf"), TargetLanguage::Java).unwrap();
        assert!(matches!(
            request.content_part,
            ContentPart::Document { ref mime, .. } if mime == "application/pdf"
        ));
    }

    #[test]
    fn test_images_become_image_parts() {
        let jpeg = build_request(&artifact("image/jpeg"), TargetLanguage::C).unwrap();
        assert!(matches!(jpeg.content_part, ContentPart::Image { ref mime, .. } if mime == "image/jpeg"));

        let png = build_request(&artifact("image/png"), TargetLanguage::C).unwrap();
        assert!(matches!(png.content_part, ContentPart::Image { ref mime, .. } if mime == "image/png"));
    }

    #[test]
    fn test_declared_casing_is_preserved() {
        let request = build_request(&artifact("Image/PNG"), TargetLanguage::C).unwrap();
        assert_eq!(request.content_part.mime_type(), "Image/PNG");
    }

    #[test]
    fn test_unsupported_types_are_rejected() {
        for declared in ["image/webp", "image/gif", "text/plain", "image/jpg", ""] {
            let err = build_request(&artifact(declared), TargetLanguage::Python).unwrap_err();
            assert!(
                matches!(err, Error::UnsupportedMediaType(ref m) if m == declared),
                "expected rejection for {declared:?}"
            );
        }
    }

    #[test]
    fn test_instruction_mentions_language_and_constraint() {
        for lang in TargetLanguage::ALL {
            let request = build_request(&artifact("image/png"), lang).unwrap();
            let text = &request.instruction_text;
            assert!(text.contains(&format!("expert {} developer", lang)));
            assert!(text.contains(prompts::CODE_ONLY_CONSTRAINT));
            assert!(!text.contains("{{lang}}"));
        }
    }

    #[test]
    fn test_instruction_is_deterministic() {
        assert_eq!(
            instruction_text(TargetLanguage::Cpp),
            instruction_text(TargetLanguage::Cpp)
        );
        assert!(instruction_text(TargetLanguage::Cpp).contains("C++"));
    }

    #[test]
    fn test_empty_responses_signal_empty_extraction() {
        for raw in [Some(""), Some("   "), Some("\n\t"), None] {
            let result = interpret_response(raw, TargetLanguage::C);
            assert_eq!(result.text, None);
            assert_eq!(result.status(), ExtractionStatus::Empty);
        }
    }

    #[test]
    fn test_code_passes_through_unchanged() {
        let result = interpret_response(Some("int main(){}"), TargetLanguage::C);
        assert_eq!(result.text.as_deref(), Some("int main(){}"));
        assert_eq!(result.status(), ExtractionStatus::Extracted);

        let padded = "\n  print('hi')  \n";
        let result = interpret_response(Some(padded), TargetLanguage::Python);
        assert_eq!(result.text.as_deref(), Some(padded));
    }

    #[test]
    fn test_derive_extension() {
        assert_eq!(derive_extension("C++".parse().unwrap()), "cpp");
        assert_eq!(derive_extension("Python".parse().unwrap()), "py");
        assert_eq!(derive_extension("Java".parse().unwrap()), "java");
        assert_eq!(derive_extension("C".parse().unwrap()), "c");
    }
}
