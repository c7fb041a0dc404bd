//! Test environment builder for isolated Sitepack testing.
//!
//! Provides `TestEnv` - an isolated bundle directory in a tempdir, plus
//! helpers to run sitepack CLI commands against it.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Result of running a sitepack CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Check if command succeeded
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Extract the first 16-digit run from published output.
///
/// Generated tokens are always 16 digits, so this recovers the token a
/// build chose from any file it stamped.
pub fn extract_token(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        let len = bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if len == 16 {
            return Some(text[start..start + 16].to_string());
        }
        start += len.max(1);
    }
    None
}

/// Isolated bundle directory with CLI execution helpers.
pub struct TestEnv {
    /// Temporary directory holding the bundle
    pub bundle_root: TempDir,
    /// Path to the sitepack binary
    sitepack_bin: PathBuf,
}

impl TestEnv {
    /// Create a new TestEnvBuilder
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::new()
    }

    /// Get path relative to the bundle root
    pub fn bundle_path(&self, relative: &str) -> PathBuf {
        self.bundle_root.path().join(relative)
    }

    /// Get path under the default output directory (`out/`)
    pub fn out_path(&self, relative: &str) -> PathBuf {
        self.bundle_root.path().join("out").join(relative)
    }

    /// Run sitepack CLI from the bundle root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_from(self.bundle_root.path(), args)
    }

    /// Run sitepack CLI from a specific directory
    pub fn run_from(&self, cwd: &Path, args: &[&str]) -> TestResult {
        let output = Command::new(&self.sitepack_bin)
            .current_dir(cwd)
            .args(args)
            .output()
            .expect("Failed to execute sitepack");

        self.output_to_result(output)
    }

    /// Convert Command output to TestResult
    fn output_to_result(&self, output: Output) -> TestResult {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Read a published file's content from the default output directory
    pub fn read_published_file(&self, relative_path: &str) -> String {
        let full_path = self.out_path(relative_path);
        std::fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("Failed to read published file {}: {}", relative_path, e))
    }

    /// Write a file into the bundle directory
    pub fn write_bundle_file(&self, relative_path: &str, content: &str) {
        self.write_bundle_bytes(relative_path, content.as_bytes());
    }

    /// Write raw bytes into the bundle directory
    pub fn write_bundle_bytes(&self, relative_path: &str, content: &[u8]) {
        let full_path = self.bundle_path(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
    }
}

/// Builder for TestEnv with fluent API
pub struct TestEnvBuilder {
    files: Vec<(String, Vec<u8>)>,
    manifest: Option<String>,
    write_manifest: bool,
}

impl TestEnvBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            manifest: None,
            write_manifest: true,
        }
    }

    /// Set sitepack.toml content
    pub fn with_manifest(mut self, toml: &str) -> Self {
        self.manifest = Some(toml.to_string());
        self
    }

    /// Do not write a sitepack.toml for this bundle
    pub fn without_manifest(mut self) -> Self {
        self.write_manifest = false;
        self
    }

    /// Add a text file to the bundle
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files
            .push((path.to_string(), content.as_bytes().to_vec()));
        self
    }

    /// Add a binary file to the bundle
    pub fn with_binary_file(mut self, path: &str, content: &[u8]) -> Self {
        self.files.push((path.to_string(), content.to_vec()));
        self
    }

    /// Install the standard bundle fixture: template, worker, engine
    /// sources, stylesheet pair and the full manifest wiring them up.
    pub fn standard_bundle(self) -> Self {
        use super::fixtures::*;

        self.with_manifest(MANIFEST_FULL)
            .with_file("index.html", INDEX_TEMPLATE)
            .with_file("worker.js", WORKER_JS)
            .with_file("engine.js", ENGINE_JS)
            .with_binary_file("pkg/engine.wasm", ENGINE_WASM)
            .with_file("css/site.css", SITE_CSS)
            .with_file("css/print.css", PRINT_CSS)
    }

    /// Build the TestEnv
    pub fn build(self) -> TestEnv {
        let bundle_root = TempDir::new().expect("Failed to create bundle temp dir");

        if self.write_manifest {
            let content = self
                .manifest
                .as_deref()
                .unwrap_or("[output]\ndir = \"out\"\n");
            std::fs::write(bundle_root.path().join("sitepack.toml"), content)
                .expect("Failed to write sitepack.toml");
        }

        for (path, content) in &self.files {
            let full_path = bundle_root.path().join(path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create file directory");
            }
            std::fs::write(&full_path, content).expect("Failed to write bundle file");
        }

        TestEnv {
            bundle_root,
            sitepack_bin: PathBuf::from(env!("CARGO_BIN_EXE_sitepack")),
        }
    }
}

impl Default for TestEnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}
