//! Line-stream driver.
//!
//! Reads newline-delimited input, skips blank lines, hands every other line
//! to a [`ScrubberSession`] and writes the result to an optional sink. With
//! no sink the run is a dry run: everything is computed and audited but
//! nothing is written.

use crate::classify::find_all;
use crate::error::Result;
use crate::session::{JsonFailure, ScrubberSession};
use serde::Serialize;
use std::io::{BufRead, Write};

/// Lines between debug progress events.
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Lines read, including blank ones.
    pub total_lines: u64,
    /// Non-blank lines handed to the session.
    pub processed: u64,
    /// Blank or whitespace-only lines skipped.
    pub empty: u64,
    /// Lines emitted unscrubbed because processing failed.
    pub failed: u64,
    /// Lines handled as JSON objects.
    pub json_lines: u64,
    /// Lines handled as plain text.
    pub plain_lines: u64,
    /// Sampled plain-text fallbacks.
    pub json_failures: Vec<JsonFailure>,
}

impl RunSummary {
    /// Share of parsed lines handled as JSON, in percent.
    pub fn json_percent(&self) -> f64 {
        percent(self.json_lines, self.json_lines + self.plain_lines)
    }

    /// Share of parsed lines handled as plain text, in percent.
    pub fn plain_percent(&self) -> f64 {
        percent(self.plain_lines, self.json_lines + self.plain_lines)
    }

    /// Whether any line was emitted unscrubbed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Scrub every line of `reader` through `session`.
///
/// Output lines are written in input order with `\n` terminators; blank input
/// lines are dropped. Lines that are not valid UTF-8 are scrubbed as plain
/// text with their undecodable bytes kept as they are. Read and write errors
/// abort the run.
pub fn scrub_stream<R: BufRead>(
    session: &mut ScrubberSession,
    mut reader: R,
    mut sink: Option<&mut dyn Write>,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    let mut buf = Vec::new();
    let dry_run = sink.is_none();
    let verbose = session.options().verbose;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        summary.total_lines += 1;
        let line_number = summary.total_lines;
        let raw = trim_line_ending(&buf);

        match std::str::from_utf8(raw) {
            Ok(line) if line.trim().is_empty() => {
                summary.empty += 1;
            }
            Ok(line) => {
                summary.processed += 1;
                let outcome = session.process_line(line, line_number as usize);
                if outcome.is_failure() {
                    summary.failed += 1;
                }

                if let Some(out) = sink.as_mut() {
                    out.write_all(outcome.output.as_bytes())?;
                    out.write_all(b"\n")?;
                } else if verbose && outcome.output != line {
                    let detections = find_all(line);
                    let kinds: Vec<&str> = detections.iter().map(|d| d.kind.as_str()).collect();
                    tracing::info!(
                        target: "scrub_engine::pipeline",
                        line_number,
                        detections = detections.len(),
                        kinds = %kinds.join(","),
                        "line would be scrubbed"
                    );
                }
            }
            Err(_) => {
                summary.processed += 1;
                tracing::debug!(
                    target: "scrub_engine::pipeline",
                    line_number,
                    "line is not valid UTF-8; scrubbing decodable runs"
                );
                let output = session.process_bytes(raw, line_number as usize);
                if let Some(out) = sink.as_mut() {
                    out.write_all(&output)?;
                    out.write_all(b"\n")?;
                } else if verbose && output != raw {
                    tracing::info!(target: "scrub_engine::pipeline", line_number, "line would be scrubbed");
                }
            }
        }

        if line_number % PROGRESS_INTERVAL == 0 {
            tracing::debug!(
                target: "scrub_engine::pipeline",
                lines = line_number,
                processed = summary.processed,
                "progress"
            );
        }
    }

    if let Some(out) = sink.as_mut() {
        out.flush()?;
    }

    let stats = session.stats();
    summary.json_lines = stats.json_lines;
    summary.plain_lines = stats.plain_lines;
    summary.json_failures = stats.failures.clone();

    tracing::debug!(
        target: "scrub_engine::pipeline",
        total = summary.total_lines,
        processed = summary.processed,
        empty = summary.empty,
        failed = summary.failed,
        dry_run,
        "stream complete"
    );

    Ok(summary)
}

fn trim_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}
