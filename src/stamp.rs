//! Text rewrites applied to published assets.
//!
//! Three rewrites run against files in the output tree: suffixing quoted
//! asset references with the version token, maintaining the leading
//! `var <name> = <token>;` declaration in scripts, and joining the two
//! stylesheet halves into one file.

use std::path::Path;

use crate::error::SitepackResult;
use crate::fs::FileSystem;
use crate::token::VersionToken;

/// Append `?<token>` to every quoted occurrence of an asset filename.
///
/// Both quote styles are matched and preserved: `"engine.wasm"` becomes
/// `"engine.wasm?1234"` and `'engine.wasm'` becomes `'engine.wasm?1234'`.
/// Only the bare quoted name matches, so references already carrying a
/// token (`"engine.wasm?old"`) are left untouched and never accumulate
/// suffixes. Stamped files are rebuilt from their sources on the next run,
/// which is where stale tokens get refreshed.
pub fn stamp_references(text: &str, asset: &str, token: VersionToken) -> String {
    let mut out = text.to_string();
    for quote in ['"', '\''] {
        let needle = format!("{quote}{asset}{quote}");
        let replacement = format!("{quote}{asset}?{token}{quote}");
        out = out.replace(&needle, &replacement);
    }
    out
}

/// Prepend a fresh `var <name> = <token>;` line, replacing any prior ones.
///
/// A prior declaration is recognized only by the exact line shape
/// `var <name> = <digits>;` at the start of the text; anything else counts
/// as "no prior declaration" and the fresh line simply goes in front.
/// Multiple accumulated declarations are collapsed to one.
pub fn ensure_version_declaration(text: &str, name: &str, token: VersionToken) -> String {
    let mut rest = text;
    while let Some(stripped) = strip_declaration_line(rest, name) {
        rest = stripped;
    }
    format!("var {name} = {token};\n{rest}")
}

/// Strip one leading declaration line for `name`, newline included.
///
/// Returns `None` unless the text starts with `var <name> = <digits>;`
/// followed by a newline or the end of the text.
fn strip_declaration_line<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let after_prefix = text
        .strip_prefix("var ")?
        .strip_prefix(name)?
        .strip_prefix(" = ")?;

    let digits = after_prefix.len() - after_prefix.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }

    let after_semi = after_prefix[digits..].strip_prefix(';')?;
    if after_semi.is_empty() {
        Some(after_semi)
    } else {
        after_semi.strip_prefix('\n')
    }
}

/// True if `name` can appear on the left of a `var` declaration.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Join two stylesheet contents with exactly one newline separator,
/// primary first.
pub fn concat_stylesheets(primary: &str, secondary: &str) -> String {
    let mut out = String::with_capacity(primary.len() + secondary.len() + 1);
    out.push_str(primary);
    if !primary.is_empty() && !primary.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(secondary);
    out
}

/// Read and join two stylesheet files. Missing files surface as `NotFound`.
pub fn concat_files(
    fs: &dyn FileSystem,
    primary: &Path,
    secondary: &Path,
) -> SitepackResult<String> {
    let a = fs.read_to_string(primary)?;
    let b = fs.read_to_string(secondary)?;
    Ok(concat_stylesheets(&a, &b))
}
