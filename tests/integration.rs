use scriptox::{
    ai::{MockSynthesisClient, SynthesisService},
    app::App,
    models::{Config, ContentPart, ExtractionStatus, TargetLanguage, UploadedArtifact},
    normalizer::{build_request, derive_extension, interpret_response},
    session::{Phase, Session, SessionOptions},
    upload::read_artifact,
    Error,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pdf_of_size(size: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.4\n".to_vec();
    bytes.resize(size, b' ');
    bytes
}

fn config_for(server: &MockServer) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("GEMINI_API_KEY", "integration-key".to_string()),
        ("GEMINI_BASE_URL", server.uri()),
        ("SCRIPTOX_TIMEOUT_SECS", "5".to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

#[tokio::test]
async fn test_pdf_to_java_with_mock_model() {
    let artifact = UploadedArtifact::new(pdf_of_size(120 * 1024), "application/pdf");

    let request = build_request(&artifact, TargetLanguage::Java).unwrap();
    assert!(matches!(
        request.content_part,
        ContentPart::Document { ref mime, ref bytes } if mime == "application/pdf" && bytes.len() == 120 * 1024
    ));
    assert!(request.instruction_text.contains("Java"));

    let model = MockSynthesisClient::new().with_text_response("class A {}");
    let raw = model.synthesize(&request).await.unwrap();
    let result = interpret_response(raw.as_deref(), TargetLanguage::Java);

    assert_eq!(result.text.as_deref(), Some("class A {}"));
    assert_eq!(result.status(), ExtractionStatus::Extracted);
    assert_eq!(derive_extension(TargetLanguage::Java), "java");
}

#[tokio::test]
async fn test_app_against_gemini_wire_format() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "integration-key"))
        .and(body_string_contains("\"mimeType\":\"application/pdf\""))
        .and(body_string_contains("expert Java developer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "class A {}" }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let upload_path = dir.path().join("record.pdf");
    std::fs::write(&upload_path, pdf_of_size(120 * 1024)).unwrap();

    let app = App::from_config(&config_for(&server)).unwrap();
    let artifact = read_artifact(&upload_path, None).await.unwrap();
    let export = app
        .run(artifact, TargetLanguage::Java)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(export.file_name, "record.java");
    assert_eq!(export.contents, "class A {}");
    assert_eq!(export.mime_type, "text/plain");

    let saved = export.write_to_dir(&dir.path().join("out")).await.unwrap();
    assert_eq!(std::fs::read_to_string(saved).unwrap(), "class A {}");
}

#[tokio::test]
async fn test_app_reports_provider_failure_and_recovers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "print('ok')" }] } }]
        })))
        .mount(&server)
        .await;

    let app = App::from_config(&config_for(&server)).unwrap();
    let artifact = UploadedArtifact::new(vec![0x89, 0x50, 0x4E, 0x47], "image/png");

    let err = app
        .run(artifact.clone(), TargetLanguage::Python)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SynthesisCall(ref m) if m.contains("internal error")));
    assert_eq!(app.session().phase(), Phase::Failed);

    let export = app
        .run(artifact, TargetLanguage::Python)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(export.contents, "print('ok')");
}

#[tokio::test]
async fn test_app_empty_extraction_from_gemini() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "  \n" }] } }]
        })))
        .mount(&server)
        .await;

    let app = App::from_config(&config_for(&server)).unwrap();
    let artifact = UploadedArtifact::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg");

    let export = app.run(artifact, TargetLanguage::C).await.unwrap();
    assert!(export.is_none());
    assert_eq!(app.session().phase(), Phase::SucceededEmpty);
}

#[tokio::test]
async fn test_unsupported_upload_never_hits_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let upload_path = dir.path().join("scan.webp");
    std::fs::write(&upload_path, [0x52, 0x49, 0x46, 0x46]).unwrap();

    let app = App::from_config(&config_for(&server)).unwrap();
    let artifact = read_artifact(&upload_path, None).await.unwrap();
    let err = app.run(artifact, TargetLanguage::C).await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedMediaType(ref m) if m == "image/webp"));
}

#[tokio::test]
async fn test_concurrent_trigger_is_never_dispatched() {
    let model = MockSynthesisClient::new()
        .with_text_response("int main(){}")
        .with_delay(Duration::from_millis(300));
    let session = Arc::new(Session::new(
        Arc::new(model.clone()),
        SessionOptions::default(),
    ));
    session
        .load(UploadedArtifact::new(vec![0x89, 0x50], "image/png"))
        .unwrap();

    let first = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.synthesize(TargetLanguage::C).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = session.synthesize(TargetLanguage::C).await;
    assert!(matches!(second, Err(Error::SynthesisInFlight)));

    let result = first.await.unwrap().unwrap();
    assert_eq!(result.text.as_deref(), Some("int main(){}"));
    assert_eq!(model.get_call_count(), 1);
}

#[test]
fn test_missing_credential_is_fatal() {
    let err = Config::from_lookup(|_| None).unwrap_err();
    assert!(matches!(err, Error::MissingCredential(_)));
    assert!(err.is_fatal());
}
