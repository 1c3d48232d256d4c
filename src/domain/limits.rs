// 上傳限制為編譯期常數，執行期不可修改
use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_FILE_UPLOADS: usize = 2;

pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png"];

pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

pub static FILENAME_ALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9 _.\-]+$").unwrap());

pub fn is_allowed_mime_type(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

pub fn is_allowed_extension(ext: &str) -> bool {
    ALLOWED_EXTENSIONS.contains(&ext)
}

/// "JPG, JPEG, PNG" built from the extension allow-list.
pub fn format_allowed_types() -> String {
    ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| ext.trim_start_matches('.').to_uppercase())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_max_size(bytes: u64) -> String {
    let mib = 1024 * 1024;
    if bytes % mib == 0 {
        format!("{} MB", bytes / mib)
    } else {
        format!("{:.1} MB", bytes as f64 / mib as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_allowed_types() {
        assert_eq!(format_allowed_types(), "JPG, JPEG, PNG");
    }

    #[test]
    fn test_format_max_size() {
        assert_eq!(format_max_size(MAX_FILE_SIZE_BYTES), "10 MB");
        assert_eq!(format_max_size(1536 * 1024), "1.5 MB");
    }

    #[test]
    fn test_filename_pattern() {
        assert!(FILENAME_ALLOWED.is_match("passport front_1.jpg"));
        assert!(FILENAME_ALLOWED.is_match("id-card.PNG"));
        assert!(!FILENAME_ALLOWED.is_match("scan(1).jpg"));
        assert!(!FILENAME_ALLOWED.is_match(""));
    }
}
