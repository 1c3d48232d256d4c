// 上傳檔案驗證：先檢查數量，再逐一檢查每個檔案

use crate::domain::limits::{
    format_allowed_types, format_max_size, is_allowed_extension, is_allowed_mime_type,
    FILENAME_ALLOWED, MAX_FILE_SIZE_BYTES, MAX_FILE_UPLOADS,
};
use crate::domain::model::{Rejection, RejectionKind, Submission, UploadCandidate, ValidationOutcome};

/// Validate a submission in either form.
///
/// Returns `Err` when the submission is rejected as a whole (empty batch,
/// too many files, missing required file); otherwise one outcome per file in
/// submission order.
pub fn validate_submission(submission: Submission) -> Result<Vec<ValidationOutcome>, Rejection> {
    match submission {
        Submission::One(None) => Err(Rejection::new(
            RejectionKind::MissingFile,
            "File is required. Please attach a file and try again.",
        )),
        Submission::One(Some(candidate)) => Ok(vec![validate_candidate(candidate)]),
        Submission::Many(candidates) => validate_batch(candidates),
    }
}

pub fn validate_batch(candidates: Vec<UploadCandidate>) -> Result<Vec<ValidationOutcome>, Rejection> {
    check_cardinality(candidates.len())?;
    Ok(candidates.into_iter().map(validate_candidate).collect())
}

pub fn check_cardinality(count: usize) -> Result<(), Rejection> {
    if count == 0 {
        return Err(Rejection::new(
            RejectionKind::EmptyBatch,
            "No files were provided. Please attach at least one file and try again.",
        ));
    }
    if count > MAX_FILE_UPLOADS {
        return Err(Rejection::new(
            RejectionKind::TooManyFiles,
            format!("You can upload up to {} files at once.", MAX_FILE_UPLOADS),
        ));
    }
    Ok(())
}

pub fn validate_candidate(candidate: UploadCandidate) -> ValidationOutcome {
    match check_candidate(&candidate) {
        Ok(()) => ValidationOutcome::Accepted(candidate),
        Err(rejection) => ValidationOutcome::Rejected(rejection),
    }
}

/// Single-file rules in order: non-empty, size ceiling, filename, type.
pub fn check_candidate(candidate: &UploadCandidate) -> Result<(), Rejection> {
    let size = match candidate.size_bytes {
        Some(size) if size > 0 => size,
        _ => {
            return Err(Rejection::new(
                RejectionKind::EmptyFile,
                "The selected file is empty. Please choose another file and try again.",
            ))
        }
    };

    if size > MAX_FILE_SIZE_BYTES {
        return Err(Rejection::new(
            RejectionKind::PayloadTooLarge,
            format!(
                "This file is too large. The maximum size allowed is {}.",
                format_max_size(MAX_FILE_SIZE_BYTES)
            ),
        ));
    }

    let base = basename(&candidate.declared_filename);
    if !FILENAME_ALLOWED.is_match(base) {
        return Err(Rejection::new(
            RejectionKind::InvalidFilename,
            "The file name contains invalid characters. Please rename the file and try again.",
        ));
    }

    let mime_ok = is_allowed_mime_type(&candidate.declared_mime_type);
    let ext_ok = extension(base)
        .map(|ext| is_allowed_extension(&ext))
        .unwrap_or(false);
    if !mime_ok || !ext_ok {
        return Err(Rejection::new(
            RejectionKind::UnsupportedMediaType,
            format!(
                "This file type isn't supported. Please upload a {} file.",
                format_allowed_types()
            ),
        ));
    }

    Ok(())
}

/// Everything after the last `/` or `\`.
pub fn basename(filename: &str) -> &str {
    match filename.rfind(|c: char| c == '/' || c == '\\') {
        Some(idx) => &filename[idx + 1..],
        None => filename,
    }
}

/// Lower-cased extension including the dot, from the last `.` on.
pub fn extension(name: &str) -> Option<String> {
    name.rfind('.').map(|idx| name[idx..].to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(name: &str, size: usize) -> UploadCandidate {
        UploadCandidate::new(name, "image/jpeg", vec![0xFF; size])
    }

    fn kind_of(outcome: &ValidationOutcome) -> Option<RejectionKind> {
        outcome.rejection().map(|r| r.kind)
    }

    #[test]
    fn test_valid_jpeg_and_png_accepted() {
        assert!(validate_candidate(jpeg("front.jpg", 128)).is_accepted());
        assert!(validate_candidate(jpeg("front.JPEG", 128)).is_accepted());
        let png = UploadCandidate::new("back side.png", "image/png", vec![1; 64]);
        assert!(validate_candidate(png).is_accepted());
    }

    #[test]
    fn test_empty_file_wins_over_other_violations() {
        let candidate = UploadCandidate::new("bad$name.gif", "image/gif", Vec::new());
        assert_eq!(
            kind_of(&validate_candidate(candidate)),
            Some(RejectionKind::EmptyFile)
        );
    }

    #[test]
    fn test_non_numeric_size_is_empty_file() {
        let candidate =
            UploadCandidate::with_declared_size("front.jpg", "image/jpeg", "abc", vec![1, 2, 3]);
        assert_eq!(candidate.size_bytes, None);
        assert_eq!(
            kind_of(&validate_candidate(candidate)),
            Some(RejectionKind::EmptyFile)
        );
    }

    #[test]
    fn test_size_boundary_is_inclusive() {
        let mut at_limit = jpeg("front.jpg", 1);
        at_limit.size_bytes = Some(MAX_FILE_SIZE_BYTES);
        assert!(validate_candidate(at_limit).is_accepted());

        let mut over = jpeg("front.jpg", 1);
        over.size_bytes = Some(MAX_FILE_SIZE_BYTES + 1);
        let outcome = validate_candidate(over);
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.kind, RejectionKind::PayloadTooLarge);
        assert!(rejection.message.contains("10 MB"));
    }

    #[test]
    fn test_path_prefix_is_stripped() {
        assert!(validate_candidate(jpeg("C:\\Users\\me\\scan(1)/front.jpg", 10)).is_accepted());
        assert!(validate_candidate(jpeg("uploads/2024/front.jpg", 10)).is_accepted());
        assert_eq!(
            kind_of(&validate_candidate(jpeg("uploads/scan(1).jpg", 10))),
            Some(RejectionKind::InvalidFilename)
        );
        assert_eq!(
            kind_of(&validate_candidate(jpeg("uploads/", 10))),
            Some(RejectionKind::InvalidFilename)
        );
    }

    #[test]
    fn test_mime_and_extension_must_both_match() {
        let gif = UploadCandidate::new("front.jpg", "image/gif", vec![1; 10]);
        let rejection = validate_candidate(gif).into_result().unwrap_err();
        assert_eq!(rejection.kind, RejectionKind::UnsupportedMediaType);
        assert!(rejection.message.contains("JPG, JPEG, PNG"));

        assert_eq!(
            kind_of(&validate_candidate(jpeg("front.gif", 10))),
            Some(RejectionKind::UnsupportedMediaType)
        );
        assert_eq!(
            kind_of(&validate_candidate(jpeg("front", 10))),
            Some(RejectionKind::UnsupportedMediaType)
        );
    }

    #[test]
    fn test_batch_cardinality_checked_before_files() {
        let err = validate_batch(Vec::new()).unwrap_err();
        assert_eq!(err.kind, RejectionKind::EmptyBatch);

        // 第三個檔案本身無效，但批次層級的錯誤優先
        let three = vec![jpeg("a.jpg", 1), jpeg("b.jpg", 1), jpeg("c.gif", 0)];
        let err = validate_batch(three).unwrap_err();
        assert_eq!(err.kind, RejectionKind::TooManyFiles);
        assert!(err.message.contains('2'));
    }

    #[test]
    fn test_batch_validates_each_file_independently() {
        let outcomes = validate_batch(vec![jpeg("a.jpg", 1), jpeg("b.bmp", 1)]).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_accepted());
        assert_eq!(kind_of(&outcomes[1]), Some(RejectionKind::UnsupportedMediaType));
    }

    #[test]
    fn test_single_submission_normalizes_to_batch() {
        let err = validate_submission(Submission::One(None)).unwrap_err();
        assert_eq!(err.kind, RejectionKind::MissingFile);

        let outcomes = validate_submission(jpeg("a.jpg", 5).into()).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_accepted());
    }

    #[test]
    fn test_basename_and_extension() {
        assert_eq!(basename("a/b\\c.jpg"), "c.jpg");
        assert_eq!(basename("plain.png"), "plain.png");
        assert_eq!(extension("photo.final.JPG").as_deref(), Some(".jpg"));
        assert_eq!(extension("noext"), None);
    }
}
