use crate::domain::model::{ImageSource, UploadCandidate};
use crate::utils::error::Result;
use async_trait::async_trait;

/// External text-detection capability.
///
/// Implementations return the full recognized text block, or
/// [`NO_TEXT_DETECTED`](crate::domain::model::NO_TEXT_DETECTED) when the
/// service found nothing. Failures of the call itself surface as
/// `IntakeError::OcrService` and are never retried here.
#[async_trait]
pub trait TextDetector: Send + Sync {
    async fn detect_text(&self, source: ImageSource) -> Result<String>;

    fn provider_name(&self) -> &str;
}

pub trait UploadSource: Send + Sync {
    fn read_candidate(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<UploadCandidate>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn ocr_endpoint(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn request_timeout_secs(&self) -> u64;
}
