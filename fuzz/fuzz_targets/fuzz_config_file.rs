//! Fuzz target for scrubber_config.json parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scrub_config::{resolve_settings, CliOverrides, ConfigFile};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Parsing may fail; merging a parsed file must not panic.
    if let Ok(config) = text.parse::<ConfigFile>() {
        let _ = resolve_settings(&CliOverrides::default(), Some(&config));
    }
});
