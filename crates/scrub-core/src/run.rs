//! One scrubbing run, from validated settings to written files.
//!
//! Order of work: banner, open the input, output conflict, scrub the stream,
//! audit conflict, audit export, summary. The audit path is only checked once processing is
//! done so that a slow run does not hold a prompt open.

use crate::audit::{write_audit, AuditError};
use crate::exit_codes::ExitCode;
use crate::logging::generate_run_id;
use crate::output::{resolve_conflict, ConflictError, OutputSink};
use scrub_common::ValueKind;
use scrub_config::{ValidatedSettings, ValidationError};
use scrub_engine::{
    scrub_stream, RunSummary, ScrubError, ScrubberSession, SessionOptions, DEFAULT_DOMAIN_SUFFIX,
};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failing line numbers listed in the summary.
const LISTED_FAILURE_LINES: usize = 5;

/// Failure samples printed in verbose mode.
const PRINTED_FAILURE_SAMPLES: usize = 3;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{0}")]
    Config(ValidationError),

    #[error("{0}")]
    Validation(ValidationError),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Cancelled(ConflictError),

    #[error("scrubbing failed: {0}")]
    Engine(#[from] ScrubError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error("failed to write to console: {0}")]
    Console(#[source] io::Error),
}

impl RunError {
    /// Exit code reported for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RunError::Config(_) => ExitCode::ConfigError,
            RunError::Validation(e) if e.is_input_error() => ExitCode::InputError,
            RunError::Validation(_) => ExitCode::ConfigError,
            RunError::Cancelled(ConflictError::Prompt(_)) => ExitCode::IoError,
            RunError::Cancelled(_) => ExitCode::Cancelled,
            RunError::Io { .. } | RunError::Engine(_) | RunError::Audit(_) => ExitCode::IoError,
            RunError::Console(_) => ExitCode::IoError,
        }
    }
}

impl From<ConflictError> for RunError {
    fn from(err: ConflictError) -> Self {
        RunError::Cancelled(err)
    }
}

/// Replacement counts by kind, taken from the audit ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplacementCounts {
    pub emails: usize,
    pub usernames: usize,
    pub ips: usize,
    pub uids: usize,
    /// Sum of `TimesReplaced` over all records.
    pub total: u64,
}

/// What a finished run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub summary: RunSummary,
    /// Where scrubbed lines were written; `None` on a dry run.
    pub output: Option<PathBuf>,
    /// Where the audit file was written; `None` on a dry run.
    pub audit: Option<PathBuf>,
    pub counts: ReplacementCounts,
}

impl RunReport {
    /// `LinesFailed` when any line went out unscrubbed, else `Clean`.
    pub fn exit_code(&self) -> ExitCode {
        if self.summary.has_failures() {
            ExitCode::LinesFailed
        } else {
            ExitCode::Clean
        }
    }
}

/// Run the scrubber with validated settings.
///
/// Conflict prompts are read from `prompt_in`; the banner, prompts and
/// summary go to `out`.
pub fn execute<R: BufRead, W: Write>(
    settings: &ValidatedSettings,
    prompt_in: &mut R,
    out: &mut W,
) -> Result<RunReport, RunError> {
    let run_id = generate_run_id();
    let span = tracing::info_span!(target: "log_scrubber", "run", run_id = %run_id);
    let _guard = span.enter();

    print_banner(settings, out).map_err(RunError::Console)?;

    // Nothing on disk is touched until the input is known to be readable.
    let input = File::open(&settings.input).map_err(io_at(&settings.input))?;
    let reader = BufReader::new(input);

    let mut sink = None;
    let mut output_path = None;
    if !settings.dry_run {
        let path = resolve_conflict(&settings.output, settings.overwrite, prompt_in, out)?;
        if path != settings.output {
            writeln!(out, "Output will be written to: {}", path.display())
                .map_err(RunError::Console)?;
        }
        sink = Some(OutputSink::create(&path, settings.compress).map_err(io_at(&path))?);
        output_path = Some(path);
    }

    let mut session = ScrubberSession::new(session_options(settings));
    tracing::info!(
        target: "log_scrubber",
        input = %settings.input.display(),
        level = %settings.level,
        dry_run = settings.dry_run,
        compressed = sink.as_ref().is_some_and(OutputSink::is_compressed),
        "scrubbing started"
    );
    let summary = scrub_stream(
        &mut session,
        reader,
        sink.as_mut().map(|s| s as &mut dyn Write),
    )?;

    if let (Some(sink), Some(path)) = (sink, output_path.as_deref()) {
        sink.finish().map_err(io_at(path))?;
    }

    let ledger = session.into_ledger();
    let counts = ReplacementCounts {
        emails: ledger.count_by_kind(ValueKind::Email),
        usernames: ledger.count_by_kind(ValueKind::Username),
        ips: ledger.count_by_kind(ValueKind::Ip),
        uids: ledger.count_by_kind(ValueKind::Uid),
        total: ledger.total_replacements(),
    };

    let mut audit_path = None;
    if !settings.dry_run {
        let path = resolve_conflict(&settings.audit, settings.overwrite, prompt_in, out)?;
        if path != settings.audit {
            writeln!(out, "Audit file will be written to: {}", path.display())
                .map_err(RunError::Console)?;
        }
        write_audit(&path, ledger.records(), settings.audit_format)?;
        audit_path = Some(path);
    }

    tracing::info!(
        target: "log_scrubber",
        processed = summary.processed,
        failed = summary.failed,
        distinct_values = ledger.len(),
        replacements = counts.total,
        "scrubbing finished"
    );

    let report = RunReport {
        run_id,
        summary,
        output: output_path,
        audit: audit_path,
        counts,
    };
    print_summary(&report, settings.verbose, out).map_err(RunError::Console)?;
    Ok(report)
}

fn session_options(settings: &ValidatedSettings) -> SessionOptions {
    let source = settings
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| settings.input.display().to_string());
    let suffix = settings
        .domain_suffix
        .clone()
        .unwrap_or_else(|| DEFAULT_DOMAIN_SUFFIX.to_string());

    SessionOptions::new(settings.level)
        .with_source(source)
        .with_verbose(settings.verbose)
        .with_domain_suffix(suffix)
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> RunError + '_ {
    move |source| RunError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn print_banner<W: Write>(settings: &ValidatedSettings, out: &mut W) -> io::Result<()> {
    writeln!(out, "Input file: {}", settings.input.display())?;
    writeln!(out, "Output file: {}", settings.output.display())?;
    writeln!(out, "Audit file: {}", settings.audit.display())?;
    writeln!(out, "Scrubbing level: {}", settings.level)?;
    writeln!(out, "Dry run: {}", settings.dry_run)?;
    Ok(())
}

/// Print the end-of-run summary.
pub fn print_summary<W: Write>(report: &RunReport, verbose: bool, out: &mut W) -> io::Result<()> {
    let s = &report.summary;

    write!(
        out,
        "Processed {} lines out of {} total lines",
        s.processed, s.total_lines
    )?;
    if s.empty > 0 {
        write!(out, " ({} empty lines skipped)", s.empty)?;
    }
    if s.failed > 0 {
        write!(
            out,
            " ({} lines failed processing but were included)",
            s.failed
        )?;
    }
    writeln!(out)?;

    if s.json_lines + s.plain_lines > 0 {
        writeln!(
            out,
            "JSON processed: {} lines ({:.1}%)",
            s.json_lines,
            s.json_percent()
        )?;
        writeln!(
            out,
            "Plain text processed: {} lines ({:.1}%)",
            s.plain_lines,
            s.plain_percent()
        )?;
    }

    if s.plain_lines > 0 && !s.json_failures.is_empty() {
        writeln!(out, "\nJSON Processing Issues:")?;
        writeln!(
            out,
            "  {} lines had JSON parsing issues and were processed as plain text",
            s.plain_lines
        )?;

        let listed: Vec<String> = s
            .json_failures
            .iter()
            .take(LISTED_FAILURE_LINES)
            .map(|f| f.line_number.to_string())
            .collect();
        write!(out, "  Lines with issues: {}", listed.join(", "))?;
        if s.json_failures.len() > LISTED_FAILURE_LINES {
            write!(
                out,
                "... and {} more",
                s.plain_lines - LISTED_FAILURE_LINES as u64
            )?;
        }
        writeln!(out)?;

        if verbose {
            writeln!(out, "  Sample failure details:")?;
            for failure in s.json_failures.iter().take(PRINTED_FAILURE_SAMPLES) {
                writeln!(out, "    Line {}: {}", failure.line_number, failure.sample)?;
                writeln!(out, "      Error: {}", failure.error)?;
            }
            if s.json_failures.len() > PRINTED_FAILURE_SAMPLES {
                writeln!(
                    out,
                    "    ... and {} more failures",
                    s.json_failures.len() - PRINTED_FAILURE_SAMPLES
                )?;
            }
        }
    }

    match (&report.output, &report.audit) {
        (Some(output), Some(audit)) => {
            writeln!(
                out,
                "Log scrubbing completed successfully. Output written to: {}",
                output.display()
            )?;
            writeln!(out, "Audit log written to: {}", audit.display())?;
        }
        _ => writeln!(
            out,
            "Dry run completed successfully. No files were modified."
        )?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrub_common::{AuditFormat, OverwriteAction, ScrubLevel};
    use scrub_engine::JsonFailure;
    use std::io::Cursor;

    const SCENARIO: &str = r#"{"user":"alice","email":"alice@corp.com","ip":"10.1.2.3"}"#;

    fn settings(dir: &Path, level: ScrubLevel) -> ValidatedSettings {
        let input = dir.join("server.log");
        ValidatedSettings {
            output: dir.join("server_scrubbed.log"),
            audit: dir.join("server_audit.csv"),
            input_size: std::fs::metadata(&input).map(|m| m.len()).unwrap_or(0),
            input,
            audit_format: AuditFormat::Csv,
            level,
            overwrite: OverwriteAction::Overwrite,
            domain_suffix: None,
            verbose: false,
            dry_run: false,
            compress: false,
            max_file_size: u64::MAX,
        }
    }

    fn run(settings: &ValidatedSettings) -> (Result<RunReport, RunError>, String) {
        let mut out = Vec::new();
        let result = execute(settings, &mut Cursor::new(Vec::new()), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_scenario_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("server.log"), format!("{SCENARIO}\n")).unwrap();
        let settings = settings(dir.path(), ScrubLevel::High);

        let (result, stdout) = run(&settings);
        let report = result.unwrap();

        let written = std::fs::read_to_string(&settings.output).unwrap();
        assert_eq!(
            written,
            "{\"user\":\"user1\",\"email\":\"user1@domain1.example.com\",\"ip\":\"***.***.***.***\"}\n"
        );
        assert_eq!(report.counts.ips, 1);
        assert_eq!(report.counts.emails, 1);
        assert_eq!(report.counts.usernames, 1);
        assert_eq!(report.exit_code(), ExitCode::Clean);
        assert!(stdout.contains("Scrubbing level: 3"));
        assert!(stdout.contains("JSON processed: 1 lines (100.0%)"));
        assert!(stdout.contains("Audit log written to:"));
        assert!(report.run_id.starts_with("run-"));
    }

    #[test]
    fn test_dry_run_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("server.log"), format!("{SCENARIO}\n")).unwrap();
        let mut settings = settings(dir.path(), ScrubLevel::Medium);
        settings.dry_run = true;

        let (result, stdout) = run(&settings);
        let report = result.unwrap();
        assert!(report.output.is_none());
        assert!(report.audit.is_none());
        assert!(!settings.output.exists());
        assert!(!settings.audit.exists());
        assert_eq!(report.counts.emails, 1);
        assert!(stdout.contains("Dry run completed successfully"));
    }

    #[test]
    fn test_cancel_policy_aborts_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("server.log"), "plain\n").unwrap();
        let mut settings = settings(dir.path(), ScrubLevel::Low);
        std::fs::write(&settings.output, "keep me").unwrap();
        settings.overwrite = OverwriteAction::Cancel;

        let (result, _) = run(&settings);
        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::Cancelled);
        assert_eq!(std::fs::read_to_string(&settings.output).unwrap(), "keep me");
        assert!(!settings.audit.exists());
    }

    #[test]
    fn test_prompt_rename_reports_new_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("server.log"), "plain\n").unwrap();
        let mut settings = settings(dir.path(), ScrubLevel::Low);
        std::fs::write(&settings.output, "old").unwrap();
        settings.overwrite = OverwriteAction::Prompt;

        let mut out = Vec::new();
        let report = execute(&settings, &mut Cursor::new(b"r\n".to_vec()), &mut out).unwrap();
        let stdout = String::from_utf8(out).unwrap();

        let renamed = report.output.unwrap();
        assert_ne!(renamed, settings.output);
        assert!(stdout.contains("Output will be written to:"));
        assert_eq!(std::fs::read_to_string(&settings.output).unwrap(), "old");
        assert_eq!(std::fs::read_to_string(renamed).unwrap(), "plain\n");
    }

    #[test]
    fn test_reverted_line_sets_lines_failed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("server.log"),
            "{\"user\":\"al\\\"ice\",\"msg\":\"x\"}\n",
        )
        .unwrap();
        let settings = settings(dir.path(), ScrubLevel::Low);

        let (result, stdout) = run(&settings);
        let report = result.unwrap();
        assert_eq!(report.exit_code(), ExitCode::LinesFailed);
        assert!(stdout.contains("1 lines failed processing but were included"));
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), ScrubLevel::Low);
        let (result, _) = run(&settings);
        let err = result.unwrap_err();
        assert!(matches!(err, RunError::Io { .. }));
        assert_eq!(err.exit_code(), ExitCode::IoError);
    }

    #[test]
    fn test_error_exit_codes() {
        let input = RunError::Validation(ValidationError::NotFound(PathBuf::from("x")));
        assert_eq!(input.exit_code(), ExitCode::InputError);
        let bad_level = RunError::Validation(ValidationError::InvalidValue {
            field: "level".into(),
            message: "bad".into(),
        });
        assert_eq!(bad_level.exit_code(), ExitCode::ConfigError);
        let config = RunError::Config(ValidationError::ParseError("x".into()));
        assert_eq!(config.exit_code(), ExitCode::ConfigError);
        let user = RunError::from(ConflictError::CancelledByUser);
        assert_eq!(user.exit_code(), ExitCode::Cancelled);
    }

    #[test]
    fn test_summary_lists_failures() {
        let failures = (1..=7)
            .map(|n| JsonFailure {
                line_number: n,
                error: "expected value".to_string(),
                sample: format!("line {n}"),
            })
            .collect();
        let report = RunReport {
            run_id: "run-test".to_string(),
            summary: RunSummary {
                total_lines: 8,
                processed: 7,
                empty: 1,
                failed: 0,
                json_lines: 0,
                plain_lines: 7,
                json_failures: failures,
            },
            output: None,
            audit: None,
            counts: ReplacementCounts::default(),
        };

        let mut out = Vec::new();
        print_summary(&report, true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Processed 7 lines out of 8 total lines (1 empty lines skipped)"));
        assert!(text.contains("Plain text processed: 7 lines (100.0%)"));
        assert!(text.contains("Lines with issues: 1, 2, 3, 4, 5... and 2 more"));
        assert!(text.contains("    Line 3: line 3"));
        assert!(!text.contains("    Line 4:"));
        assert!(text.contains("    ... and 4 more failures"));
    }

    fn failing_summary(plain_lines: u64, samples: usize) -> RunReport {
        let failures = (1..=samples)
            .map(|n| JsonFailure {
                line_number: n,
                error: "expected value".to_string(),
                sample: format!("line {n}"),
            })
            .collect();
        RunReport {
            run_id: "run-test".to_string(),
            summary: RunSummary {
                total_lines: plain_lines,
                processed: plain_lines,
                empty: 0,
                failed: 0,
                json_lines: 0,
                plain_lines,
                json_failures: failures,
            },
            output: None,
            audit: None,
            counts: ReplacementCounts::default(),
        }
    }

    #[test]
    fn test_summary_counts_samples_not_plain_lines() {
        // 40 plain-text lines, but only the first 10 are kept as samples.
        let report = failing_summary(40, 10);
        let mut out = Vec::new();
        print_summary(&report, true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Lines with issues: 1, 2, 3, 4, 5... and 35 more"));
        assert!(text.contains("    ... and 7 more failures"));
    }

    #[test]
    fn test_summary_short_failure_list_has_no_tail() {
        let report = failing_summary(3, 3);
        let mut out = Vec::new();
        print_summary(&report, true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  Lines with issues: 1, 2, 3\n"));
        assert!(!text.contains("more failures"));
    }

    #[test]
    fn test_missing_input_leaves_existing_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), ScrubLevel::Low);
        std::fs::write(&settings.output, "previous run\n").unwrap();

        let (result, _) = run(&settings);
        assert!(matches!(result.unwrap_err(), RunError::Io { .. }));
        assert_eq!(
            std::fs::read_to_string(&settings.output).unwrap(),
            "previous run\n"
        );
        assert!(!settings.audit.exists());
    }
}
