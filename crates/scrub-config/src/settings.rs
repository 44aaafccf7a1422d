//! CLI/config-file precedence.
//!
//! Each field is taken from the CLI when given, else from the config file,
//! else from the built-in default. Boolean flags can only be switched on from
//! the CLI; an absent flag defers to the file.

use crate::file::ConfigFile;
use crate::size::{parse_file_size, DEFAULT_MAX_FILE_SIZE};
use scrub_common::{AuditFormat, OverwriteAction};
use std::path::{Path, PathBuf};

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub audit: Option<PathBuf>,
    pub audit_format: Option<AuditFormat>,
    pub level: Option<i64>,
    pub overwrite: Option<OverwriteAction>,
    pub max_file_size: Option<String>,
    pub domain_suffix: Option<String>,
    pub verbose: bool,
    pub dry_run: bool,
    pub compress: bool,
}

/// Settings after merging CLI and file values, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub input: Option<PathBuf>,
    /// Explicit output path; derived from the input when absent.
    pub output: Option<PathBuf>,
    /// Explicit audit path; derived from the input when absent.
    pub audit: Option<PathBuf>,
    pub audit_format: AuditFormat,
    pub level: Option<i64>,
    pub overwrite: OverwriteAction,
    pub max_file_size: u64,
    pub domain_suffix: Option<String>,
    pub verbose: bool,
    pub dry_run: bool,
    pub compress: bool,
}

/// Merge CLI overrides with an optional config file.
///
/// An unparsable max size falls back to the default with a warning.
pub fn resolve_settings(cli: &CliOverrides, config: Option<&ConfigFile>) -> ResolvedSettings {
    let file = config.map(|c| &c.file_settings);
    let scrub = config.map(|c| &c.scrub_settings);

    let input = cli
        .input
        .clone()
        .or_else(|| non_empty_path(file.and_then(|f| f.input_file.as_deref())));
    let output = cli
        .output
        .clone()
        .or_else(|| non_empty_path(file.and_then(|f| f.output_file.as_deref())));
    let audit = cli
        .audit
        .clone()
        .or_else(|| non_empty_path(file.and_then(|f| f.audit_file.as_deref())));

    let audit_format = cli
        .audit_format
        .or_else(|| file.and_then(|f| f.audit_file_type))
        .unwrap_or_default();
    let overwrite = cli
        .overwrite
        .or_else(|| file.and_then(|f| f.overwrite_action))
        .unwrap_or_default();

    let level = cli.level.or_else(|| scrub.and_then(|s| s.scrub_level));
    let domain_suffix = cli
        .domain_suffix
        .clone()
        .or_else(|| scrub.and_then(|s| s.domain_suffix.clone()));

    let verbose = cli.verbose
        || config
            .and_then(|c| c.output_settings.verbose)
            .unwrap_or(false);
    let compress = cli.compress || file.and_then(|f| f.compress_output_file).unwrap_or(false);

    let size_text = cli.max_file_size.clone().or_else(|| {
        config.and_then(|c| c.processing_settings.max_input_file_size.clone())
    });
    let max_file_size = match size_text.as_deref() {
        Some(text) => parse_file_size(text).unwrap_or_else(|err| {
            tracing::warn!(value = text, error = %err, "invalid max file size; using default");
            DEFAULT_MAX_FILE_SIZE
        }),
        None => DEFAULT_MAX_FILE_SIZE,
    };

    ResolvedSettings {
        input,
        output,
        audit,
        audit_format,
        level,
        overwrite,
        max_file_size,
        domain_suffix,
        verbose,
        dry_run: cli.dry_run,
        compress,
    }
}

fn non_empty_path(value: Option<&str>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Suffix appended to the input stem for derived output paths.
pub const SCRUB_SUFFIX: &str = "_scrubbed";

/// Suffix appended to the input stem for derived audit paths.
pub const AUDIT_SUFFIX: &str = "_audit";

/// Output path next to the input: `<stem>_scrubbed<ext>`, plus `.gz` when
/// compressing.
pub fn default_output_path(input: &Path, compress: bool) -> PathBuf {
    let ext = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let gz = if compress { ".gz" } else { "" };
    sibling(input, &format!("{}{}{}{}", stem(input), SCRUB_SUFFIX, ext, gz))
}

/// Audit path next to the input: `<stem>_audit.<csv|json>`.
pub fn default_audit_path(input: &Path, format: AuditFormat) -> PathBuf {
    sibling(
        input,
        &format!("{}{}.{}", stem(input), AUDIT_SUFFIX, format.extension()),
    )
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    match path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
