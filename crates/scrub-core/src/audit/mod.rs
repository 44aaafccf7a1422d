//! Audit file export.
//!
//! The audit file lists every distinct original value that was replaced,
//! its replacement, how often it was replaced, its kind and its source file.

pub mod writer;

pub use writer::{write_audit, write_csv, write_json, CSV_HEADER};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing the audit file.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to write audit file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
