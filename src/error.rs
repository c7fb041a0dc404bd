//! Error types for Sitepack
//!
//! Uses `thiserror` for library errors; the binary wraps them with `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Sitepack operations
pub type SitepackResult<T> = Result<T, SitepackError>;

/// Main error type for Sitepack operations
#[derive(Error, Debug)]
pub enum SitepackError {
    /// A declared source path does not exist
    #[error("not found: {path}")]
    NotFound { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest could not be parsed
    #[error("invalid manifest {file}: {message}")]
    Manifest { file: PathBuf, message: String },

    /// Template placeholder problem
    #[error("template error in {file}: {message}")]
    Template { file: PathBuf, message: String },

    /// A fonts exclude pattern is not valid gitignore syntax
    #[error("invalid exclude pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Destination escapes the output root
    #[error("path '{path}' escapes output root '{root}'")]
    PathEscape { path: PathBuf, root: PathBuf },
}
