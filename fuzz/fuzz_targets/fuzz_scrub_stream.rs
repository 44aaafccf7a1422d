//! Fuzz target for whole-stream scrubbing.
//!
//! Arbitrary bytes, including invalid UTF-8 and stray carriage returns, are
//! fed through the stream driver. It must never panic and must never emit
//! more lines than it read.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scrub_common::ScrubLevel;
use scrub_engine::{scrub_stream, ScrubberSession, SessionOptions};
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    let mut session = ScrubberSession::new(SessionOptions::new(ScrubLevel::High));
    let mut out: Vec<u8> = Vec::new();

    if let Ok(summary) = scrub_stream(&mut session, data, Some(&mut out as &mut dyn Write)) {
        let written = out.iter().filter(|&&b| b == b'\n').count() as u64;
        assert_eq!(written, summary.processed);
    }
});
