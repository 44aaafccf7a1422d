//! Log scrubber common types.
//!
//! This crate provides the vocabulary shared by the engine, the config
//! layer and the CLI:
//! - Scrubbing levels
//! - Kinds of scrubbed values (the audit `Type` column)
//! - Audit file formats and overwrite-conflict actions
//! - Parse errors for the above

pub mod error;
pub mod kind;
pub mod level;
pub mod output;

pub use error::{ParseError, Result};
pub use kind::ValueKind;
pub use level::ScrubLevel;
pub use output::{AuditFormat, OverwriteAction};

/// Application name used for binaries, config directories and version output.
pub const APP_NAME: &str = "log-scrubber";
