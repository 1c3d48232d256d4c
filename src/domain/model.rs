use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// OCR 服務未偵測到任何文字時回傳的固定字串
pub const NO_TEXT_DETECTED: &str = "No text detected";

/// One submitted file, held in memory for the duration of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub raw_bytes: Vec<u8>,
    pub declared_filename: String,
    pub declared_mime_type: String,
    /// `None` when the transport could not supply a well-formed size.
    pub size_bytes: Option<u64>,
}

impl UploadCandidate {
    pub fn new(
        declared_filename: impl Into<String>,
        declared_mime_type: impl Into<String>,
        raw_bytes: Vec<u8>,
    ) -> Self {
        let size_bytes = Some(raw_bytes.len() as u64);
        Self {
            raw_bytes,
            declared_filename: declared_filename.into(),
            declared_mime_type: declared_mime_type.into(),
            size_bytes,
        }
    }

    /// Build a candidate whose size comes from a transport header rather than the buffer.
    pub fn with_declared_size(
        declared_filename: impl Into<String>,
        declared_mime_type: impl Into<String>,
        declared_size: &str,
        raw_bytes: Vec<u8>,
    ) -> Self {
        Self {
            raw_bytes,
            declared_filename: declared_filename.into(),
            declared_mime_type: declared_mime_type.into(),
            size_bytes: declared_size.trim().parse().ok(),
        }
    }
}

/// Single-file (legacy) or multi-file submission.
#[derive(Debug, Clone)]
pub enum Submission {
    /// Legacy single-file field; `None` when the required file was not attached.
    One(Option<UploadCandidate>),
    Many(Vec<UploadCandidate>),
}

impl From<UploadCandidate> for Submission {
    fn from(candidate: UploadCandidate) -> Self {
        Submission::One(Some(candidate))
    }
}

impl From<Vec<UploadCandidate>> for Submission {
    fn from(candidates: Vec<UploadCandidate>) -> Self {
        Submission::Many(candidates)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionKind {
    EmptyBatch,
    TooManyFiles,
    MissingFile,
    EmptyFile,
    PayloadTooLarge,
    InvalidFilename,
    UnsupportedMediaType,
}

impl RejectionKind {
    pub fn status_code(&self) -> u16 {
        match self {
            RejectionKind::PayloadTooLarge => 413,
            RejectionKind::UnsupportedMediaType => 415,
            _ => 400,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionKind::EmptyBatch => "EmptyBatch",
            RejectionKind::TooManyFiles => "TooManyFiles",
            RejectionKind::MissingFile => "MissingFile",
            RejectionKind::EmptyFile => "EmptyFile",
            RejectionKind::PayloadTooLarge => "PayloadTooLarge",
            RejectionKind::InvalidFilename => "InvalidFilename",
            RejectionKind::UnsupportedMediaType => "UnsupportedMediaType",
        }
    }
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct Rejection {
    pub kind: RejectionKind,
    pub message: String,
}

impl Rejection {
    pub fn new(kind: RejectionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted(UploadCandidate),
    Rejected(Rejection),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            ValidationOutcome::Accepted(_) => None,
            ValidationOutcome::Rejected(rejection) => Some(rejection),
        }
    }

    pub fn into_result(self) -> Result<UploadCandidate, Rejection> {
        match self {
            ValidationOutcome::Accepted(candidate) => Ok(candidate),
            ValidationOutcome::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Where the OCR gateway should read the image from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Bytes(Vec<u8>),
    /// Local path or remote reference (`gs://`, `http(s)://`).
    Location(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrText {
    pub filename: String,
    pub text: String,
}

impl OcrText {
    pub fn has_text(&self) -> bool {
        self.text != NO_TEXT_DETECTED
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

impl ExtractedFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.number.is_none() && self.expiry_date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeEntry {
    pub filename: String,
    pub raw_text: String,
    pub extracted_fields: ExtractedFields,
}

/// Entries in submission order, one per accepted file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntakeResult {
    pub entries: Vec<IntakeEntry>,
}

impl IntakeResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
