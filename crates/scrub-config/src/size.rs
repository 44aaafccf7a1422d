//! Human-readable file sizes.
//!
//! Units are 1024-based: `B`, `KB`, `MB`, `GB`, `TB`.

use crate::validate::{ValidationError, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// Default maximum input size (150 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 150 * 1024 * 1024;

static SIZE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*(B|KB|MB|GB|TB)?$").unwrap());

/// Parse a size such as `150MB`, `2.5gb` or `1024`.
///
/// An empty string yields [`DEFAULT_MAX_FILE_SIZE`]. A bare number is bytes.
pub fn parse_file_size(input: &str) -> ValidationResult<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_MAX_FILE_SIZE);
    }

    let upper = trimmed.to_uppercase();
    let caps = SIZE_PATTERN
        .captures(&upper)
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "max_file_size".to_string(),
            message: format!(
                "invalid file size format: {} (expected format like '150MB', '1GB')",
                input
            ),
        })?;

    let number: f64 = caps[1].parse().map_err(|_| ValidationError::InvalidValue {
        field: "max_file_size".to_string(),
        message: format!("invalid numeric value in file size: {}", &caps[1]),
    })?;

    let multiplier: u64 = match caps.get(2).map(|m| m.as_str()).unwrap_or("B") {
        "KB" => 1 << 10,
        "MB" => 1 << 20,
        "GB" => 1 << 30,
        "TB" => 1 << 40,
        _ => 1,
    };

    Ok((number * multiplier as f64) as u64)
}

/// Format a byte count as `512 B`, `1.5 KB`, `150.0 MB`, ...
pub fn format_file_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

    if bytes < UNIT {
        return format!("{} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT && exp < PREFIXES.len() - 1 {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!("{:.1} {}B", bytes as f64 / div as f64, PREFIXES[exp])
}
