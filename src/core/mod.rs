pub mod comparison;
pub mod extractor;
pub mod intake;
pub mod response;
pub mod validator;

pub use crate::domain::model::{
    ExtractedFields, IntakeEntry, IntakeResult, OcrText, Submission, UploadCandidate,
    ValidationOutcome,
};
pub use crate::domain::ports::{ConfigProvider, TextDetector, UploadSource};
pub use crate::utils::error::Result;
