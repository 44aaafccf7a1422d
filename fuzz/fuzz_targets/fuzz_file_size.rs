//! Fuzz target for human-readable file size parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scrub_config::{format_file_size, parse_file_size};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if let Ok(bytes) = parse_file_size(&text) {
        let _ = format_file_size(bytes);
    }
});
