use crate::domain::model::{ImageSource, NO_TEXT_DETECTED};
use crate::domain::ports::{ConfigProvider, TextDetector};
use crate::utils::error::{IntakeError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

const TEXT_DETECTION: &str = "TEXT_DETECTION";

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
struct AnnotateImageRequest {
    image: VisionImage,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct VisionImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<RemoteImage>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoteImage {
    image_uri: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<VisionStatus>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct VisionStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

/// OCR gateway backed by the Cloud Vision `images:annotate` REST endpoint.
pub struct VisionTextDetector {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl VisionTextDetector {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| IntakeError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.ocr_endpoint(),
            config.api_key().map(str::to_string),
            config.request_timeout_secs(),
        )
    }

    async fn build_image(&self, source: ImageSource) -> Result<VisionImage> {
        let image = match source {
            ImageSource::Bytes(bytes) => VisionImage {
                content: Some(STANDARD.encode(bytes)),
                source: None,
            },
            ImageSource::Location(location) if is_remote(&location) => VisionImage {
                content: None,
                source: Some(RemoteImage {
                    image_uri: location,
                }),
            },
            ImageSource::Location(path) => {
                tracing::debug!("Reading image from local path: {}", path);
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|e| IntakeError::ocr(format!("could not read image {}: {}", path, e)))?;
                VisionImage {
                    content: Some(STANDARD.encode(bytes)),
                    source: None,
                }
            }
        };
        Ok(image)
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("gs://")
        || location.starts_with("http://")
        || location.starts_with("https://")
}

#[async_trait]
impl TextDetector for VisionTextDetector {
    async fn detect_text(&self, source: ImageSource) -> Result<String> {
        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: self.build_image(source).await?,
                features: vec![Feature {
                    kind: TEXT_DETECTION,
                }],
            }],
        };

        tracing::debug!("Sending text detection request to: {}", self.endpoint);
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }
        let response = request.send().await?;

        let status = response.status();
        tracing::debug!("Text detection response status: {}", status);
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(IntakeError::ocr(format!(
                "text detection returned {}: {}",
                status,
                detail.trim()
            )));
        }

        let payload: AnnotateResponse = response.json().await?;
        let Some(result) = payload.responses.into_iter().next() else {
            return Ok(NO_TEXT_DETECTED.to_string());
        };

        if let Some(error) = result.error {
            return Err(IntakeError::ocr(format!(
                "text detection failed (code {}): {}",
                error.code, error.message
            )));
        }

        // 第一個 annotation 是完整的文字區塊
        let text = result
            .text_annotations
            .into_iter()
            .next()
            .map(|annotation| annotation.description)
            .filter(|description| !description.is_empty())
            .unwrap_or_else(|| NO_TEXT_DETECTED.to_string());

        Ok(text)
    }

    fn provider_name(&self) -> &str {
        "google-vision"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn detector(server: &MockServer) -> VisionTextDetector {
        VisionTextDetector::new(server.url("/v1/images:annotate"), Some("test-key".to_string()), 5)
            .unwrap()
    }

    #[tokio::test]
    async fn test_detect_text_returns_first_annotation() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/images:annotate")
                .query_param("key", "test-key")
                .body_contains("TEXT_DETECTION")
                .body_contains(&STANDARD.encode(b"jpeg-bytes"));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "responses": [{
                        "textAnnotations": [
                            {"description": "NAME: Jane Cooper\nID-48213907"},
                            {"description": "NAME:"}
                        ]
                    }]
                }));
        });

        let text = detector(&server)
            .detect_text(ImageSource::Bytes(b"jpeg-bytes".to_vec()))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(text, "NAME: Jane Cooper\nID-48213907");
    }

    #[tokio::test]
    async fn test_no_annotations_yields_sentinel() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/images:annotate");
            then.status(200)
                .json_body(serde_json::json!({ "responses": [{}] }));
        });

        let text = detector(&server)
            .detect_text(ImageSource::Bytes(vec![1, 2, 3]))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(text, NO_TEXT_DETECTED);
    }

    #[tokio::test]
    async fn test_server_error_is_ocr_service_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/images:annotate");
            then.status(403).body("API key not valid");
        });

        let err = detector(&server)
            .detect_text(ImageSource::Bytes(vec![1, 2, 3]))
            .await
            .unwrap_err();

        api_mock.assert_hits(1);
        assert!(matches!(err, IntakeError::OcrService { .. }));
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_per_image_error_is_ocr_service_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/images:annotate");
            then.status(200).json_body(serde_json::json!({
                "responses": [{ "error": { "code": 3, "message": "Bad image data." } }]
            }));
        });

        let err = detector(&server)
            .detect_text(ImageSource::Bytes(vec![0]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Bad image data."));
    }

    #[tokio::test]
    async fn test_remote_location_sent_as_image_uri() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/images:annotate")
                .body_contains("\"imageUri\":\"gs://bucket/front.jpg\"");
            then.status(200).json_body(serde_json::json!({
                "responses": [{ "textAnnotations": [{ "description": "PASSPORT X1234567" }] }]
            }));
        });

        let text = detector(&server)
            .detect_text(ImageSource::Location("gs://bucket/front.jpg".to_string()))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(text, "PASSPORT X1234567");
    }

    #[tokio::test]
    async fn test_local_path_is_read_and_sent_as_content() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"local-image").unwrap();

        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/images:annotate")
                .body_contains(&STANDARD.encode(b"local-image"));
            then.status(200).json_body(serde_json::json!({ "responses": [] }));
        });

        let path = file.path().to_str().unwrap().to_string();
        let text = detector(&server)
            .detect_text(ImageSource::Location(path))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(text, NO_TEXT_DETECTED);
    }

    #[tokio::test]
    async fn test_unreadable_local_path_is_ocr_service_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/images:annotate");
            then.status(200).json_body(serde_json::json!({ "responses": [] }));
        });

        let err = detector(&server)
            .detect_text(ImageSource::Location("/nonexistent/front.jpg".to_string()))
            .await
            .unwrap_err();

        // 讀檔失敗不送出請求
        api_mock.assert_hits(0);
        assert!(matches!(err, IntakeError::OcrService { .. }));
        assert_eq!(err.status_code(), 502);
    }

    #[tokio::test]
    async fn test_empty_description_yields_sentinel() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/images:annotate");
            then.status(200).json_body(serde_json::json!({
                "responses": [{ "textAnnotations": [{ "description": "" }] }]
            }));
        });

        let text = detector(&server)
            .detect_text(ImageSource::Bytes(vec![9, 9, 9]))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(text, NO_TEXT_DETECTED);
    }
}
