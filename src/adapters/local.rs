use crate::domain::model::UploadCandidate;
use crate::domain::ports::UploadSource;
use crate::utils::error::Result;
use std::path::Path;

/// Reads upload candidates from a local directory, the way a multipart
/// transport would hand them over. No validation happens here.
#[derive(Debug, Clone)]
pub struct LocalUploadSource {
    base_path: String,
}

impl LocalUploadSource {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl UploadSource for LocalUploadSource {
    async fn read_candidate(&self, path: &str) -> Result<UploadCandidate> {
        let full_path = Path::new(&self.base_path).join(path);
        let raw_bytes = tokio::fs::read(&full_path).await?;

        let declared_filename = full_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        let declared_mime_type = mime_guess::from_path(&full_path)
            .first_or_octet_stream()
            .to_string();

        tracing::debug!(
            "Loaded {} ({}, {} bytes)",
            declared_filename,
            declared_mime_type,
            raw_bytes.len()
        );

        Ok(UploadCandidate::new(
            declared_filename,
            declared_mime_type,
            raw_bytes,
        ))
    }
}
