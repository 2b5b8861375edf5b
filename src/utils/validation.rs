use url::Url;
use validator::Validate;

use crate::error::{Error, Result};

pub fn validate<T: Validate>(val: &T) -> std::result::Result<(), validator::ValidationErrors> {
    val.validate()
}

/// Trims the value; empty stays empty so autosave can clear a field.
/// Anything else must be an absolute http(s) URL.
pub fn normalize_http_url(field: &str, value: Option<String>) -> Result<Option<String>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Some(String::new()));
    }
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
            Ok(Some(trimmed.to_string()))
        }
        _ => Err(Error::BadRequest(format!("{} must be an http(s) URL", field))),
    }
}

/// Trims entries and drops blanks and case-insensitive duplicates, keeping
/// the first spelling.
pub fn normalize_list(values: Option<Vec<String>>) -> Option<Vec<String>> {
    values.map(|items| {
        let mut seen = std::collections::HashSet::new();
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.to_lowercase()))
            .collect()
    })
}

pub fn normalize_text(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string())
}
