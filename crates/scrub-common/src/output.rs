//! Output-side settings: audit file format and overwrite-conflict action.

use crate::ParseError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Serialization format of the audit file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditFormat {
    /// Comma-separated values with a header row (default)
    #[default]
    Csv,

    /// Pretty-printed JSON array of records
    Json,
}

impl AuditFormat {
    /// File extension (without the dot) used for derived audit paths.
    pub fn extension(&self) -> &'static str {
        match self {
            AuditFormat::Csv => "csv",
            AuditFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for AuditFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(AuditFormat::Csv),
            "json" => Ok(AuditFormat::Json),
            _ => Err(ParseError::UnknownAuditFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for AuditFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// What to do when an output or audit file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwriteAction {
    /// Ask on the terminal for each conflict (default)
    #[default]
    Prompt,

    /// Replace the existing file
    Overwrite,

    /// Write next to it with a timestamp suffix
    Timestamp,

    /// Abort the run
    Cancel,
}

impl std::str::FromStr for OverwriteAction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prompt" => Ok(OverwriteAction::Prompt),
            "overwrite" => Ok(OverwriteAction::Overwrite),
            "timestamp" => Ok(OverwriteAction::Timestamp),
            "cancel" => Ok(OverwriteAction::Cancel),
            _ => Err(ParseError::UnknownOverwriteAction(s.to_string())),
        }
    }
}

impl std::fmt::Display for OverwriteAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverwriteAction::Prompt => write!(f, "prompt"),
            OverwriteAction::Overwrite => write!(f, "overwrite"),
            OverwriteAction::Timestamp => write!(f, "timestamp"),
            OverwriteAction::Cancel => write!(f, "cancel"),
        }
    }
}
