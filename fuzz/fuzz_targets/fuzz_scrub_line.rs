//! Fuzz target for single-line scrubbing.
//!
//! Every line must come back without panicking, and a line that parsed as a
//! JSON object must still parse after scrubbing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scrub_common::ScrubLevel;
use scrub_engine::{LineDisposition, ScrubberSession, SessionOptions};
use serde::de::IgnoredAny;

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);

    for level in ScrubLevel::ALL {
        let mut session = ScrubberSession::new(SessionOptions::new(level).with_source("fuzz.log"));
        let outcome = session.process_line(&line, 1);

        if outcome.disposition == LineDisposition::Json {
            assert!(
                serde_json::from_str::<IgnoredAny>(&outcome.output).is_ok(),
                "scrubbed JSON line no longer parses"
            );
        }
    }
});
