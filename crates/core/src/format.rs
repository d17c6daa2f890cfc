//! Human-readable renderings of artifact metadata.

use chrono::{DateTime, SecondsFormat};

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Formats a byte count with 1024-based units, at most two decimals, trailing zeros dropped.
///
/// `0 B`, `512 B`, `1.5 KB`, `50 MB`. Anything from 1 TiB up is still shown in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", scaled);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Formats an upload timestamp as RFC 3339 in UTC with millisecond precision.
///
/// Out-of-range values fall back to the raw millisecond count.
pub fn format_upload_time(uploaded_at_millis: i64) -> String {
    match DateTime::from_timestamp_millis(uploaded_at_millis) {
        Some(ts) => ts.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => uploaded_at_millis.to_string(),
    }
}
