use crate::domain::model::{Rejection, RejectionKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("{0}")]
    Rejected(#[from] Rejection),

    #[error("OCR service error: {message}")]
    OcrService { message: String },

    #[error("OCR task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid {field}: {message}")]
    InvalidFieldError { field: String, message: String },
}

impl From<reqwest::Error> for IntakeError {
    fn from(err: reqwest::Error) -> Self {
        // 傳輸層失敗一律視為 OCR 服務錯誤，不在此重試
        IntakeError::OcrService {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Upstream,
    Configuration,
    System,
}

impl IntakeError {
    pub fn ocr(message: impl Into<String>) -> Self {
        IntakeError::OcrService {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            IntakeError::Rejected(_) | IntakeError::InvalidFieldError { .. } => {
                ErrorCategory::Validation
            }
            IntakeError::OcrService { .. } => ErrorCategory::Upstream,
            IntakeError::ConfigError { .. }
            | IntakeError::InvalidConfigValueError { .. }
            | IntakeError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            IntakeError::TaskFailed(_)
            | IntakeError::IoError(_)
            | IntakeError::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// The rejection kind when this error is a validation rejection.
    pub fn rejection_kind(&self) -> Option<RejectionKind> {
        match self {
            IntakeError::Rejected(rejection) => Some(rejection.kind),
            _ => None,
        }
    }

    /// HTTP-style status code for the transport layer.
    pub fn status_code(&self) -> u16 {
        match self {
            IntakeError::Rejected(rejection) => rejection.kind.status_code(),
            IntakeError::InvalidFieldError { .. } => 400,
            IntakeError::OcrService { .. } => 502,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            IntakeError::Rejected(rejection) => rejection.message.clone(),
            IntakeError::InvalidFieldError { message, .. } => message.clone(),
            IntakeError::OcrService { .. } | IntakeError::TaskFailed(_) => {
                "We could not read the document right now. Please try again later.".to_string()
            }
            IntakeError::IoError(e) => format!("File could not be read: {}", e),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => {
                "Check the file type, size and name, then submit the documents again"
            }
            ErrorCategory::Upstream => {
                "Check the OCR endpoint, API key and quota; the request was not retried"
            }
            ErrorCategory::Configuration => "Review the configuration file and command-line flags",
            ErrorCategory::System => "Check file permissions and available resources",
        }
    }
}

pub type Result<T> = std::result::Result<T, IntakeError>;
