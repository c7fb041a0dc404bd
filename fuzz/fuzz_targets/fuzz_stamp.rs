#![no_main]

use libfuzzer_sys::fuzz_target;
use sitepack::VersionToken;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // First line is the asset/identifier name, the rest is the text
        let (name, text) = content.split_once('\n').unwrap_or((content, ""));
        let token = VersionToken::new(text.len() as u64);

        // Rewrites should never panic, whatever the name contains
        let _ = sitepack::stamp::stamp_references(text, name, token);
        let _ = sitepack::stamp::ensure_version_declaration(text, name, token);
        let _ = sitepack::stamp::is_valid_identifier(name);
    }
});
