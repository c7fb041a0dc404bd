#![no_main]

use libfuzzer_sys::fuzz_target;
use sitepack::VersionToken;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let fake_path = Path::new("fuzz.html");

        // Rendering and placeholder scanning should never panic
        let _ = sitepack::template::render_str(content, fake_path, VersionToken::new(1));
        let _ = sitepack::template::placeholders(content, fake_path);
    }
});
