// 與表單資料比對，只供參考

use crate::domain::model::ExtractedFields;
use crate::utils::error::{IntakeError, Result};
use crate::utils::validation::Validate;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const MAX_NAME_LENGTH: usize = 50;

static LATIN_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s'\-]+$").unwrap());

static DATE_OF_BIRTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0[1-9]|[12][0-9]|3[01])\.(0[1-9]|1[0-2])\.(19|20)[0-9]{2}$").unwrap()
});

static UIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{11}$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub first_name: String,
    pub last_name: String,
    /// DD.MM.YYYY
    pub date_of_birth: String,
    pub citizenship: String,
    /// Unique identification number, 11 digits.
    pub uin: String,
    pub consent: bool,
}

fn invalid(field: &str, message: impl Into<String>) -> IntakeError {
    IntakeError::InvalidFieldError {
        field: field.to_string(),
        message: message.into(),
    }
}

fn validate_latin(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, format!("{} should not be empty.", field)));
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(invalid(
            field,
            format!("{} exceeds {} characters.", field, MAX_NAME_LENGTH),
        ));
    }
    if !LATIN_NAME.is_match(value) {
        return Err(invalid(
            field,
            format!(
                "{} contains invalid characters. Allowed characters: Latin letters, space, hyphen, apostrophe.",
                field
            ),
        ));
    }
    Ok(())
}

impl Validate for PersonalDetails {
    fn validate(&self) -> Result<()> {
        validate_latin("firstName", &self.first_name)?;
        validate_latin("lastName", &self.last_name)?;

        if !DATE_OF_BIRTH.is_match(&self.date_of_birth) {
            return Err(invalid(
                "dateOfBirth",
                "dateOfBirth must match the DD.MM.YYYY format.",
            ));
        }

        validate_latin("citizenship", &self.citizenship)?;

        if !UIN.is_match(&self.uin) {
            return Err(invalid("uin", "uin must be exactly 11 digits."));
        }

        if !self.consent {
            return Err(invalid("consent", "consent must be given."));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FieldMatch {
    Match,
    Mismatch { extracted: String, declared: String },
    NotExtracted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpiryStatus {
    Valid,
    Expired,
    Unparseable,
    NotExtracted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub name: FieldMatch,
    pub expiry: ExpiryStatus,
}

impl ComparisonReport {
    pub fn needs_review(&self) -> bool {
        !matches!(self.name, FieldMatch::Match) || self.expiry != ExpiryStatus::Valid
    }
}

pub fn compare(
    fields: &ExtractedFields,
    first_name: &str,
    last_name: &str,
    today: NaiveDate,
) -> ComparisonReport {
    ComparisonReport {
        name: compare_name(fields.name.as_deref(), first_name, last_name),
        expiry: expiry_status(fields.expiry_date.as_deref(), today),
    }
}

pub fn compare_details(
    fields: &ExtractedFields,
    details: &PersonalDetails,
    today: NaiveDate,
) -> ComparisonReport {
    compare(fields, &details.first_name, &details.last_name, today)
}

fn normalize_name(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Either "first last" or "last first" counts as a match.
pub fn compare_name(extracted: Option<&str>, first_name: &str, last_name: &str) -> FieldMatch {
    let Some(extracted) = extracted else {
        return FieldMatch::NotExtracted;
    };

    let found = normalize_name(extracted);
    let given_first = normalize_name(&format!("{} {}", first_name, last_name));
    let family_first = normalize_name(&format!("{} {}", last_name, first_name));

    if found == given_first || found == family_first {
        FieldMatch::Match
    } else {
        FieldMatch::Mismatch {
            extracted: extracted.to_string(),
            declared: format!("{} {}", first_name.trim(), last_name.trim()),
        }
    }
}

pub fn expiry_status(expiry: Option<&str>, today: NaiveDate) -> ExpiryStatus {
    let Some(expiry) = expiry else {
        return ExpiryStatus::NotExtracted;
    };

    match parse_expiry(expiry) {
        // 到期當天仍視為有效
        Some(date) if date >= today => ExpiryStatus::Valid,
        Some(_) => ExpiryStatus::Expired,
        None => ExpiryStatus::Unparseable,
    }
}

/// Parse `D/M/YY[YY]`, `D-M-YY[YY]`, `YYYY-M-D` or `YYYY/M/D`. Two-digit years are 20YY.
pub fn parse_expiry(value: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.split(|c: char| c == '/' || c == '-').collect();
    if parts.len() != 3 {
        return None;
    }

    let (year, month, day) = if parts[0].len() == 4 {
        (parts[0], parts[1], parts[2])
    } else {
        (parts[2], parts[1], parts[0])
    };

    let mut year = year.parse::<i32>().ok()?;
    match year {
        0..=99 => year += 2000,
        1000..=9999 => {}
        _ => return None,
    }
    let month = month.parse::<u32>().ok()?;
    let day = day.parse::<u32>().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}
