//! Handling of output and audit paths that already exist.

use chrono::{DateTime, Local};
use scrub_common::OverwriteAction;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Timestamp format for renamed files.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Why a conflicting path could not be written.
#[derive(Debug, Error)]
pub enum ConflictError {
    #[error("file '{}' already exists and OverwriteAction is set to 'cancel'", .0.display())]
    CancelledByPolicy(PathBuf),

    #[error("operation cancelled by user")]
    CancelledByUser,

    #[error("failed to read user input: {0}")]
    Prompt(#[from] io::Error),
}

/// Decide where to write when `path` may already exist.
///
/// Returns the path to write to: `path` itself when it does not exist or is
/// to be overwritten, or a timestamped sibling. The prompt is written to
/// `out` and answered from `input`; invalid answers re-ask, end of input
/// cancels.
pub fn resolve_conflict<R: BufRead, W: Write>(
    path: &Path,
    action: OverwriteAction,
    input: &mut R,
    out: &mut W,
) -> Result<PathBuf, ConflictError> {
    if !path.exists() {
        return Ok(path.to_path_buf());
    }

    let choice = match action {
        OverwriteAction::Overwrite => Choice::Overwrite,
        OverwriteAction::Timestamp => Choice::Rename,
        OverwriteAction::Cancel => {
            return Err(ConflictError::CancelledByPolicy(path.to_path_buf()));
        }
        OverwriteAction::Prompt => prompt_choice(path, input, out)?,
    };

    match choice {
        Choice::Overwrite => {
            tracing::info!(target: "log_scrubber", path = %path.display(), "overwriting existing file");
            Ok(path.to_path_buf())
        }
        Choice::Rename => {
            let renamed = timestamped_path(path, Local::now());
            tracing::info!(
                target: "log_scrubber",
                from = %path.display(),
                to = %renamed.display(),
                "existing file kept; writing to timestamped path"
            );
            Ok(renamed)
        }
        Choice::Cancel => Err(ConflictError::CancelledByUser),
    }
}

/// Answer to the interactive prompt.
enum Choice {
    Overwrite,
    Rename,
    Cancel,
}

/// Ask until a valid answer arrives.
fn prompt_choice<R: BufRead, W: Write>(
    path: &Path,
    input: &mut R,
    out: &mut W,
) -> Result<Choice, ConflictError> {
    writeln!(out, "File '{}' already exists.", path.display())?;

    loop {
        write!(out, "Choose an option: (o)verwrite, (c)ancel, or (r)ename with timestamp? ")?;
        out.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Ok(Choice::Cancel);
        }

        match answer.trim().to_lowercase().as_str() {
            "o" | "overwrite" => return Ok(Choice::Overwrite),
            "r" | "rename" => return Ok(Choice::Rename),
            "c" | "cancel" => return Ok(Choice::Cancel),
            _ => writeln!(out, "Invalid choice. Please enter 'o', 'c', or 'r'.")?,
        }
    }
}

/// `<dir>/<stem>_<YYYYMMDD_HHMMSS><ext>` for `path` at time `now`.
pub fn timestamped_path(path: &Path, now: DateTime<Local>) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let name = format!("{}_{}{}", stem, now.format(TIMESTAMP_FORMAT), ext);

    match path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
