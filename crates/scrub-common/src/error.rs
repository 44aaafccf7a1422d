//! Error types for parsing the shared vocabulary.

use thiserror::Error;

/// Result type alias for parsing shared types.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors produced when a textual or numeric value does not name a known variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("scrubbing level must be 1, 2, or 3 (got {0})")]
    InvalidLevel(i64),

    #[error("unknown value kind: {0}")]
    UnknownKind(String),

    #[error("audit file type must be csv or json (got {0})")]
    UnknownAuditFormat(String),

    #[error("overwrite action must be one of: prompt, overwrite, timestamp, cancel (got {0})")]
    UnknownOverwriteAction(String),
}

impl ParseError {
    /// Name of the setting this error refers to, for structured reporting.
    pub fn field(&self) -> &'static str {
        match self {
            ParseError::InvalidLevel(_) => "ScrubLevel",
            ParseError::UnknownKind(_) => "Type",
            ParseError::UnknownAuditFormat(_) => "AuditFileType",
            ParseError::UnknownOverwriteAction(_) => "OverwriteAction",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::InvalidLevel(7);
        assert_eq!(err.to_string(), "scrubbing level must be 1, 2, or 3 (got 7)");
        assert_eq!(err.field(), "ScrubLevel");
    }

    #[test]
    fn test_error_fields() {
        assert_eq!(ParseError::UnknownAuditFormat("xml".into()).field(), "AuditFileType");
        assert_eq!(
            ParseError::UnknownOverwriteAction("maybe".into()).field(),
            "OverwriteAction"
        );
    }
}
