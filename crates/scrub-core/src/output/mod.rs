//! Output destinations for scrubbed lines.
//!
//! - [`OutputSink`]: plain or gzip-compressed file writer
//! - [`conflict`]: what to do when a destination already exists

pub mod conflict;

pub use conflict::{resolve_conflict, timestamped_path, ConflictError};

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// A file opened for scrubbed output.
pub enum OutputSink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputSink {
    /// Create (or truncate) `path`, wrapping it in a gzip encoder when
    /// `compress` is set.
    pub fn create(path: &Path, compress: bool) -> io::Result<Self> {
        let writer = BufWriter::new(File::create(path)?);
        Ok(if compress {
            OutputSink::Gzip(GzEncoder::new(writer, Compression::default()))
        } else {
            OutputSink::Plain(writer)
        })
    }

    /// Whether output is gzip-compressed.
    pub fn is_compressed(&self) -> bool {
        matches!(self, OutputSink::Gzip(_))
    }

    /// Flush everything and write the gzip trailer if compressing.
    pub fn finish(self) -> io::Result<()> {
        match self {
            OutputSink::Plain(mut writer) => writer.flush(),
            OutputSink::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputSink::Plain(w) => w.write(buf),
            OutputSink::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputSink::Plain(w) => w.flush(),
            OutputSink::Gzip(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_plain_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let mut sink = OutputSink::create(&path, false).unwrap();
        assert!(!sink.is_compressed());
        sink.write_all(b"line one\n").unwrap();
        sink.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "line one\n");
    }

    #[test]
    fn test_gzip_sink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log.gz");
        let mut sink = OutputSink::create(&path, true).unwrap();
        assert!(sink.is_compressed());
        sink.write_all(b"{\"user\":\"user1\"}\n").unwrap();
        sink.finish().unwrap();

        let mut text = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "{\"user\":\"user1\"}\n");
    }
}
