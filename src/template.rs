//! Template rendering for the bundle's HTML entry point.
//!
//! The renderer understands a single substitution syntax: `<%= ver %>` is
//! replaced with the build's version token. Everything else passes through
//! byte for byte. This is deliberately not a templating engine; the entry
//! point exposes exactly one substitution point and that is all a version
//! stamp needs.

use std::path::Path;

use crate::error::{SitepackError, SitepackResult};
use crate::fs::FileSystem;
use crate::token::VersionToken;

const OPEN: &str = "<%=";
const CLOSE: &str = "%>";

/// The only placeholder name the renderer accepts.
pub const VERSION_PLACEHOLDER: &str = "ver";

/// Render template content, substituting every `<%= ver %>` with the token.
///
/// `file` is used for error reporting only. An unknown placeholder name or
/// an unclosed `<%=` marker is a `Template` error.
pub fn render_str(content: &str, file: &Path, token: VersionToken) -> SitepackResult<String> {
    let mut out = String::with_capacity(content.len() + 16);
    let mut rest = content;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let marker_offset = content.len() - rest.len() + start;
        let after_open = &rest[start + OPEN.len()..];

        let end = after_open.find(CLOSE).ok_or_else(|| SitepackError::Template {
            file: file.to_path_buf(),
            message: format!(
                "unclosed '{}' at line {}",
                OPEN,
                line_of(content, marker_offset)
            ),
        })?;

        let name = after_open[..end].trim();
        if name != VERSION_PLACEHOLDER {
            return Err(SitepackError::Template {
                file: file.to_path_buf(),
                message: format!(
                    "unknown placeholder '{}' at line {}",
                    name,
                    line_of(content, marker_offset)
                ),
            });
        }

        out.push_str(&token.to_string());
        rest = &after_open[end + CLOSE.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Read and render a template file.
///
/// A missing template surfaces as `NotFound`; placeholder problems as
/// `Template`. Pure read, no side effects.
pub fn render(fs: &dyn FileSystem, path: &Path, token: VersionToken) -> SitepackResult<String> {
    let content = fs.read_to_string(path)?;
    render_str(&content, path, token)
}

/// List every placeholder name in the content, in document order.
///
/// Used by `check` to validate the placeholder contract without rendering.
/// Unknown names are returned as-is; an unclosed marker is still an error.
pub fn placeholders(content: &str, file: &Path) -> SitepackResult<Vec<String>> {
    let mut names = Vec::new();
    let mut rest = content;

    while let Some(start) = rest.find(OPEN) {
        let marker_offset = content.len() - rest.len() + start;
        let after_open = &rest[start + OPEN.len()..];

        let end = after_open.find(CLOSE).ok_or_else(|| SitepackError::Template {
            file: file.to_path_buf(),
            message: format!(
                "unclosed '{}' at line {}",
                OPEN,
                line_of(content, marker_offset)
            ),
        })?;

        names.push(after_open[..end].trim().to_string());
        rest = &after_open[end + CLOSE.len()..];
    }

    Ok(names)
}

/// 1-indexed line number of a byte offset.
fn line_of(content: &str, offset: usize) -> usize {
    content[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}
