use chrono::{DateTime, Utc};
use uuid::Uuid;

const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Formats a byte count the way it is shown next to a document, e.g.
/// `"512 B"`, `"12.3 KB"`, `"1.5 MB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.1}", value);
    let trimmed = rounded.strip_suffix(".0").unwrap_or(&rounded);
    format!("{} {}", trimmed, UNITS[unit])
}

/// Keeps `[A-Za-z0-9._-]`, replaces everything else with `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// `{userId}/{timestamp}_{filename}` with a millisecond Unix timestamp.
pub fn storage_key(user_id: Uuid, filename: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}/{}_{}",
        user_id,
        at.timestamp_millis(),
        sanitize_filename(filename)
    )
}

/// Rejects keys that could escape the storage root.
pub fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('/')
        && !key.contains('\\')
        && key.split('/').all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

/// MIME type from the file extension, `application/octet-stream` when unknown.
pub fn guess_content_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}
