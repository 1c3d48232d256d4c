use crate::core::extractor;
use crate::core::validator;
use crate::domain::model::{
    ImageSource, IntakeEntry, IntakeResult, OcrText, Submission, UploadCandidate,
    ValidationOutcome, NO_TEXT_DETECTED,
};
use crate::domain::ports::TextDetector;
use crate::utils::error::{IntakeError, Result};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Drives one submission through validation, OCR and field extraction.
pub struct IntakeOrchestrator<D: TextDetector + 'static> {
    detector: Arc<D>,
}

impl<D: TextDetector + 'static> IntakeOrchestrator<D> {
    pub fn new(detector: D) -> Self {
        Self {
            detector: Arc::new(detector),
        }
    }

    pub fn with_shared(detector: Arc<D>) -> Self {
        Self { detector }
    }

    pub async fn process(&self, submission: impl Into<Submission>) -> Result<IntakeResult> {
        let candidates = accept_all(submission.into())?;
        tracing::info!("✅ {} file(s) passed validation", candidates.len());

        let texts = self.detect_all(candidates).await?;

        let entries: Vec<IntakeEntry> = texts
            .into_iter()
            .map(|ocr| {
                let extracted_fields = extractor::extract(&ocr.text);
                tracing::debug!(
                    "Extracted from {}: name={}, number={}, expiry={}",
                    ocr.filename,
                    extracted_fields.name.is_some(),
                    extracted_fields.number.is_some(),
                    extracted_fields.expiry_date.is_some()
                );
                IntakeEntry {
                    filename: ocr.filename,
                    raw_text: ocr.text,
                    extracted_fields,
                }
            })
            .collect();

        tracing::info!("📄 Intake completed for {} file(s)", entries.len());
        Ok(IntakeResult { entries })
    }

    /// Run OCR for every candidate concurrently; results keep submission order.
    ///
    /// The first failure to come back is returned and the remaining calls are
    /// aborted with the task set.
    pub async fn detect_all(&self, candidates: Vec<UploadCandidate>) -> Result<Vec<OcrText>> {
        let mut slots: Vec<Option<OcrText>> = vec![None; candidates.len()];
        let mut tasks = JoinSet::new();

        for (index, candidate) in candidates.into_iter().enumerate() {
            let detector = Arc::clone(&self.detector);
            tasks.spawn(async move {
                let UploadCandidate {
                    raw_bytes,
                    declared_filename,
                    ..
                } = candidate;
                let text = detector.detect_text(ImageSource::Bytes(raw_bytes)).await;
                (index, declared_filename, text)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (index, filename, text) = joined?;
            match text {
                Ok(text) => {
                    // 空字串一律換成固定訊息
                    let text = if text.trim().is_empty() {
                        NO_TEXT_DETECTED.to_string()
                    } else {
                        text
                    };
                    let ocr = OcrText { filename, text };
                    if ocr.has_text() {
                        tracing::debug!("OCR finished for {} ({} chars)", ocr.filename, ocr.text.len());
                    } else {
                        tracing::warn!("⚠️ No text detected in {}", ocr.filename);
                    }
                    slots[index] = Some(ocr);
                }
                Err(e) => {
                    tracing::warn!(
                        "❌ OCR failed for {} via {}: {}",
                        filename,
                        self.detector.provider_name(),
                        e
                    );
                    return Err(e);
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

/// Validate the whole submission and fail fast on the first rejection.
pub fn accept_all(submission: Submission) -> Result<Vec<UploadCandidate>> {
    let outcomes = validator::validate_submission(submission).inspect_err(|rejection| {
        tracing::warn!("⚠️ Submission rejected ({}): {}", rejection.kind, rejection.message);
    })?;

    outcomes
        .into_iter()
        .map(ValidationOutcome::into_result)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|rejection| {
            tracing::warn!("⚠️ File rejected ({}): {}", rejection.kind, rejection.message);
            IntakeError::from(rejection)
        })
}
