//! Property tests for the stamp rewrites.

use proptest::prelude::*;

use sitepack::stamp::{concat_stylesheets, ensure_version_declaration, stamp_references};
use sitepack::VersionToken;

fn asset_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,8}\\.(js|wasm|css)").unwrap()
}

fn identifier() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z_][a-z0-9_]{0,8}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: stamping never panics and never shrinks the text.
    #[test]
    fn property_stamp_references_never_panics(
        text in "(?s).{0,256}",
        asset in asset_name(),
        token in proptest::num::u64::ANY,
    ) {
        let out = stamp_references(&text, &asset, VersionToken::new(token));
        prop_assert!(out.len() >= text.len());
    }

    /// PROPERTY: every quoted reference is stamped exactly once and a
    /// second pass with the same token changes nothing.
    #[test]
    fn property_stamp_references_idempotent(
        segments in proptest::collection::vec("[a-z ();=\\n]{0,24}", 1..6),
        asset in asset_name(),
        double_quoted in proptest::bool::ANY,
        token in proptest::num::u64::ANY,
    ) {
        let q = if double_quoted { '"' } else { '\'' };
        let text = segments.join(&format!("{q}{asset}{q}"));
        let token = VersionToken::new(token);

        let once = stamp_references(&text, &asset, token);
        let stamped = format!("{q}{asset}?{token}{q}");
        prop_assert_eq!(once.matches(&stamped).count(), segments.len() - 1);

        let twice = stamp_references(&once, &asset, token);
        prop_assert_eq!(once, twice);
    }

    /// PROPERTY: the declaration line always leads the output and a second
    /// application is a no-op.
    #[test]
    fn property_declaration_leads_and_is_idempotent(
        text in "(?s).{0,200}",
        name in identifier(),
        token in proptest::num::u64::ANY,
    ) {
        let token = VersionToken::new(token);
        let once = ensure_version_declaration(&text, &name, token);
        let declaration = format!("var {name} = {token};\n");
        prop_assert!(once.starts_with(&declaration));
        let twice = ensure_version_declaration(&once, &name, token);
        prop_assert_eq!(once, twice);
    }

    /// PROPERTY: redeclaring with a new token gives the same result as
    /// declaring on the original text. Prior tokens never pile up.
    #[test]
    fn property_declaration_survives_token_change(
        text in "[ -~\\n]{0,150}",
        name in identifier(),
        a in proptest::num::u64::ANY,
        b in proptest::num::u64::ANY,
    ) {
        let first = ensure_version_declaration(&text, &name, VersionToken::new(a));
        let second = ensure_version_declaration(&first, &name, VersionToken::new(b));
        prop_assert_eq!(
            second,
            ensure_version_declaration(&text, &name, VersionToken::new(b))
        );
    }

    /// PROPERTY: concatenation keeps the primary half at the start, the
    /// secondary at the end, and inserts at most one byte.
    #[test]
    fn property_concat_preserves_both_halves(
        primary in "(?s).{0,200}",
        secondary in "(?s).{0,200}",
    ) {
        let joined = concat_stylesheets(&primary, &secondary);
        prop_assert!(joined.starts_with(&primary));
        prop_assert!(joined.ends_with(&secondary));
        prop_assert!(joined.len() <= primary.len() + secondary.len() + 1);
    }
}
