//! Typed model of `scrubber_config.json`.
//!
//! Every section and every field is optional; absent values fall through to
//! the built-in defaults during resolution.

use crate::validate::ValidationError;
use scrub_common::{AuditFormat, OverwriteAction};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Input/output file settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FileSettings {
    pub input_file: Option<String>,
    pub output_file: Option<String>,
    pub audit_file: Option<String>,
    pub audit_file_type: Option<AuditFormat>,
    pub compress_output_file: Option<bool>,
    pub overwrite_action: Option<OverwriteAction>,
}

/// Scrubbing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScrubSettings {
    /// Raw level; range-checked during validation so out-of-range values are
    /// reported with the field name rather than as a parse failure.
    pub scrub_level: Option<i64>,
    /// Suffix for domain aliases.
    pub domain_suffix: Option<String>,
}

/// Console output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OutputSettings {
    pub verbose: Option<bool>,
}

/// Processing limits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProcessingSettings {
    /// Human-readable size such as `150MB`.
    pub max_input_file_size: Option<String>,
}

/// Complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConfigFile {
    pub file_settings: FileSettings,
    pub scrub_settings: ScrubSettings,
    pub output_settings: OutputSettings,
    pub processing_settings: ProcessingSettings,
}

impl ConfigFile {
    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        content.parse()
    }
}

impl FromStr for ConfigFile {
    type Err = ValidationError;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "FileSettings": {
                "InputFile": "mattermost.log",
                "OutputFile": "out.log",
                "AuditFile": "audit.json",
                "AuditFileType": "json",
                "CompressOutputFile": true,
                "OverwriteAction": "timestamp"
            },
            "ScrubSettings": { "ScrubLevel": 3, "DomainSuffix": "invalid" },
            "OutputSettings": { "Verbose": true },
            "ProcessingSettings": { "MaxInputFileSize": "1GB" }
        }"#;
        let config: ConfigFile = json.parse().unwrap();

        assert_eq!(config.file_settings.input_file.as_deref(), Some("mattermost.log"));
        assert_eq!(config.file_settings.audit_file_type, Some(AuditFormat::Json));
        assert_eq!(config.file_settings.compress_output_file, Some(true));
        assert_eq!(
            config.file_settings.overwrite_action,
            Some(OverwriteAction::Timestamp)
        );
        assert_eq!(config.scrub_settings.scrub_level, Some(3));
        assert_eq!(config.scrub_settings.domain_suffix.as_deref(), Some("invalid"));
        assert_eq!(config.output_settings.verbose, Some(true));
        assert_eq!(
            config.processing_settings.max_input_file_size.as_deref(),
            Some("1GB")
        );
    }

    #[test]
    fn test_missing_sections_default() {
        let config: ConfigFile = r#"{"ScrubSettings":{"ScrubLevel":2}}"#.parse().unwrap();
        assert_eq!(config.scrub_settings.scrub_level, Some(2));
        assert_eq!(config.file_settings, FileSettings::default());
        assert!(config.output_settings.verbose.is_none());
    }

    #[test]
    fn test_invalid_enum_value_is_parse_error() {
        let err = r#"{"FileSettings":{"OverwriteAction":"sometimes"}}"#
            .parse::<ConfigFile>()
            .unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = "{not json".parse::<ConfigFile>().unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ConfigFile::from_file(Path::new("/nonexistent/scrubber_config.json")).unwrap_err();
        assert!(matches!(err, ValidationError::IoError(_)));
    }
}
