//! Configuration validation errors and semantic validation.

use crate::settings::{default_audit_path, default_output_path, ResolvedSettings};
use crate::size::format_file_size;
use scrub_common::{AuditFormat, OverwriteAction, ScrubLevel};
use std::path::PathBuf;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("File '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error(
        "Input file '{}' size ({}) exceeds maximum allowed size ({}). Use --max-file-size or config setting to override",
        .path.display(),
        human(.size),
        human(.limit)
    )]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::NotFound(_) => 67,
            ValidationError::TooLarge { .. } => 68,
        }
    }

    /// Whether the error concerns the input file itself rather than settings.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ValidationError::NotFound(_) | ValidationError::TooLarge { .. }
        )
    }
}

fn human(bytes: &u64) -> String {
    format_file_size(*bytes)
}

/// Settings that passed validation, with every path decided.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub audit: PathBuf,
    pub audit_format: AuditFormat,
    pub level: ScrubLevel,
    pub overwrite: OverwriteAction,
    pub domain_suffix: Option<String>,
    pub verbose: bool,
    pub dry_run: bool,
    pub compress: bool,
    /// Size of the input file in bytes.
    pub input_size: u64,
    pub max_file_size: u64,
}

/// Validate merged settings.
///
/// Checks, in order: input given, level in 1..=3, input exists and is a
/// regular file, input size within the limit. Output and audit paths are
/// derived from the input when not given.
pub fn validate_settings(settings: &ResolvedSettings) -> ValidationResult<ValidatedSettings> {
    let input = settings
        .input
        .clone()
        .ok_or_else(|| ValidationError::MissingField("input".to_string()))?;

    let raw_level = settings
        .level
        .ok_or_else(|| ValidationError::MissingField("level".to_string()))?;
    let level = ScrubLevel::try_from(raw_level).map_err(|_| ValidationError::InvalidValue {
        field: "level".to_string(),
        message: format!("scrubbing level must be 1, 2, or 3, got {}", raw_level),
    })?;

    let metadata = match std::fs::metadata(&input) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ValidationError::NotFound(input));
        }
        Err(e) => {
            return Err(ValidationError::IoError(format!(
                "Failed to get file info for '{}': {}",
                input.display(),
                e
            )));
        }
    };
    if !metadata.is_file() {
        return Err(ValidationError::InvalidValue {
            field: "input".to_string(),
            message: format!("'{}' is not a regular file", input.display()),
        });
    }

    let input_size = metadata.len();
    if input_size > settings.max_file_size {
        return Err(ValidationError::TooLarge {
            path: input,
            size: input_size,
            limit: settings.max_file_size,
        });
    }

    let output = settings
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&input, settings.compress));
    let audit = settings
        .audit
        .clone()
        .unwrap_or_else(|| default_audit_path(&input, settings.audit_format));

    Ok(ValidatedSettings {
        input,
        output,
        audit,
        audit_format: settings.audit_format,
        level,
        overwrite: settings.overwrite,
        domain_suffix: settings.domain_suffix.clone(),
        verbose: settings.verbose,
        dry_run: settings.dry_run,
        compress: settings.compress,
        input_size,
        max_file_size: settings.max_file_size,
    })
}
