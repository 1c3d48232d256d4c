use crate::domain::model::{ExtractedFields, IntakeResult, UploadCandidate};
use crate::utils::error::{ErrorCategory, IntakeError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResult {
    pub filename: String,
    pub text: String,
    pub fields: ExtractedFields,
}

/// Validation-only answer: the files that would be sent to OCR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DryRunResponse {
    pub accepted: Vec<String>,
}

impl DryRunResponse {
    pub fn from_candidates(candidates: &[UploadCandidate]) -> Self {
        Self {
            accepted: candidates
                .iter()
                .map(|candidate| candidate.declared_filename.clone())
                .collect(),
        }
    }
}

/// Body handed to the transport layer.
///
/// Empty and oversized batches are hard rejections here (status 400); the
/// transport never answers them with a soft success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IntakeResponse {
    Success {
        results: Vec<FileResult>,
    },
    Failure {
        error: String,
        message: String,
        #[serde(rename = "statusCode")]
        status_code: u16,
    },
}

impl IntakeResponse {
    pub fn from_outcome(outcome: Result<IntakeResult>) -> Self {
        match outcome {
            Ok(result) => Self::from(result),
            Err(err) => Self::from(&err),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            IntakeResponse::Success { .. } => 200,
            IntakeResponse::Failure { status_code, .. } => *status_code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, IntakeResponse::Success { .. })
    }
}

impl From<IntakeResult> for IntakeResponse {
    fn from(result: IntakeResult) -> Self {
        let results = result
            .entries
            .into_iter()
            .map(|entry| FileResult {
                filename: entry.filename,
                text: entry.raw_text,
                fields: entry.extracted_fields,
            })
            .collect();
        IntakeResponse::Success { results }
    }
}

impl From<&IntakeError> for IntakeResponse {
    fn from(err: &IntakeError) -> Self {
        let error = match (err.rejection_kind(), err.category()) {
            (Some(kind), _) => kind.as_str().to_string(),
            (None, ErrorCategory::Upstream) => "OcrServiceError".to_string(),
            (None, ErrorCategory::Validation) => "InvalidField".to_string(),
            (None, _) => "InternalError".to_string(),
        };
        IntakeResponse::Failure {
            error,
            message: err.user_friendly_message(),
            status_code: err.status_code(),
        }
    }
}
