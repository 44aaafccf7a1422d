//! CSV and JSON audit writers.

use super::AuditError;
use scrub_common::AuditFormat;
use scrub_engine::AuditRecord;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Header row of the CSV audit file.
pub const CSV_HEADER: &str = "Original Value,New Value,Times Replaced,Type,Source";

/// Write `records` to `writer` as CSV, header first, in the given order.
pub fn write_csv<W: Write>(mut writer: W, records: &[AuditRecord]) -> io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for record in records {
        writeln!(
            writer,
            "{},{},{},{},{}",
            escape_field(&record.original_value),
            escape_field(&record.new_value),
            record.times_replaced,
            record.kind,
            escape_field(&record.source)
        )?;
    }
    writer.flush()
}

/// Write `records` to `writer` as a pretty-printed JSON array.
pub fn write_json<W: Write>(mut writer: W, records: &[AuditRecord]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    writer.flush()
}

/// Create `path` and write the audit file in `format`.
pub fn write_audit(path: &Path, records: &[AuditRecord], format: AuditFormat) -> Result<(), AuditError> {
    let io_err = |source: io::Error| AuditError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::create(path).map_err(io_err)?;
    let writer = BufWriter::new(file);

    match format {
        AuditFormat::Csv => write_csv(writer, records).map_err(io_err)?,
        AuditFormat::Json => write_json(writer, records).map_err(io_err)?,
    }

    tracing::debug!(
        target: "log_scrubber",
        path = %path.display(),
        records = records.len(),
        format = %format,
        "audit file written"
    );
    Ok(())
}

/// Quote a field when it contains a delimiter, quote, CR or LF.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
