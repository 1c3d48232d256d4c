// 從 OCR 文字抓出姓名、證件號碼與到期日

use crate::domain::model::ExtractedFields;
use once_cell::sync::Lazy;
use regex::Regex;

static DOCUMENT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:ID|DOC|PASSPORT|PAS)[\s\-]?([A-Z0-9]{6,15})").unwrap());

static EXPIRY_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:EXP|EXPIRY|VALID|VALID THRU)[\s:]+([0-9]{1,2}[/\-][0-9]{1,2}[/\-][0-9]{2,4}|[0-9]{4}[/\-][0-9]{1,2}[/\-][0-9]{1,2})",
    )
    .unwrap()
});

// 標籤不分大小寫，但姓名本身必須是首字母大寫的單字
static HOLDER_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:NAME|HOLDER|FULL NAME)[\s:]+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)+)").unwrap()
});

/// Run every pass over `text`. Never fails; an empty record is a normal result.
pub fn extract(text: &str) -> ExtractedFields {
    ExtractedFields {
        name: extract_name(text),
        number: extract_document_number(text),
        expiry_date: extract_expiry_date(text),
    }
}

pub fn extract_document_number(text: &str) -> Option<String> {
    capture(&DOCUMENT_NUMBER, text).map(|value| value.to_uppercase())
}

pub fn extract_expiry_date(text: &str) -> Option<String> {
    capture(&EXPIRY_DATE, text).map(str::to_string)
}

pub fn extract_name(text: &str) -> Option<String> {
    capture(&HOLDER_NAME, text).map(str::to_string)
}

fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
