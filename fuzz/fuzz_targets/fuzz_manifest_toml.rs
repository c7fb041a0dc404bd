#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Fuzz manifest TOML parsing - this should never panic
        let _ = toml::from_str::<sitepack::Manifest>(content);

        // The warning-collecting path runs serde_ignored and the key
        // suggestion logic on top
        let _ = sitepack::Manifest::parse_with_warnings(content, Path::new("fuzz.toml"));
    }
});
