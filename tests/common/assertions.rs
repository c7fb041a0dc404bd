//! Custom assertion macros for CLI tests.
//!
//! These macros provide descriptive failure messages to aid debugging.

use std::path::Path;

/// List all files in a directory recursively (for debugging)
pub fn list_all_files(dir: &Path) -> Vec<String> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                for sub in list_all_files(&path) {
                    files.push(sub);
                }
            } else {
                files.push(path.display().to_string());
            }
        }
    }
    files
}

/// Assert that a file was published under the default output directory.
///
/// # Example
/// ```ignore
/// assert_published!(env, "index.html");
/// ```
#[macro_export]
macro_rules! assert_published {
    ($env:expr, $path:expr) => {
        let full_path = $env.out_path($path);
        assert!(
            full_path.exists(),
            "Expected published file at 'out/{}', but it doesn't exist.\n\
             Bundle root: {:?}\n\
             Files found:\n  {}",
            $path,
            $env.bundle_root.path(),
            $crate::common::list_all_files($env.bundle_root.path()).join("\n  ")
        );
    };
}

/// Assert that a file was NOT published (should not exist in out/).
///
/// # Example
/// ```ignore
/// assert_not_published!(env, "fonts/notes.txt");
/// ```
#[macro_export]
macro_rules! assert_not_published {
    ($env:expr, $path:expr) => {
        let full_path = $env.out_path($path);
        assert!(
            !full_path.exists(),
            "Expected 'out/{}' to NOT exist, but it does.\n\
             Bundle root: {:?}",
            $path,
            $env.bundle_root.path()
        );
    };
}

/// Assert that output (stdout or stderr) contains expected pattern.
///
/// # Example
/// ```ignore
/// assert_output_contains!(result, "Publish Complete");
/// ```
#[macro_export]
macro_rules! assert_output_contains {
    ($result:expr, $pattern:expr) => {
        assert!(
            $result.stdout.contains($pattern) || $result.stderr.contains($pattern),
            "Expected output to contain '{}'\n\
             stdout:\n{}\n\
             stderr:\n{}",
            $pattern,
            $result.stdout,
            $result.stderr
        );
    };
}

/// Assert that output does NOT contain a pattern.
///
/// # Example
/// ```ignore
/// assert_output_not_contains!(result, "error");
/// ```
#[macro_export]
macro_rules! assert_output_not_contains {
    ($result:expr, $pattern:expr) => {
        assert!(
            !$result.stdout.contains($pattern) && !$result.stderr.contains($pattern),
            "Expected output to NOT contain '{}'\n\
             stdout:\n{}\n\
             stderr:\n{}",
            $pattern,
            $result.stdout,
            $result.stderr
        );
    };
}

/// Assert that a published file contains expected content.
///
/// # Example
/// ```ignore
/// assert_published_contains!(env, "worker.js", "var app_ver = ");
/// ```
#[macro_export]
macro_rules! assert_published_contains {
    ($env:expr, $path:expr, $content:expr) => {
        let full_path = $env.out_path($path);
        assert!(
            full_path.exists(),
            "Cannot check content: published file 'out/{}' doesn't exist",
            $path
        );
        let file_content = std::fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("Failed to read out/{}: {}", $path, e));
        assert!(
            file_content.contains($content),
            "Published file 'out/{}' does not contain expected content '{}'.\n\
             Actual content:\n{}",
            $path,
            $content,
            file_content
        );
    };
}
