//! File system access behind a trait.
//!
//! The build pipeline talks to a `FileSystem` so the planner and the text
//! rewrites can be exercised against an in-memory mock. `LocalFs` is the
//! real implementation with atomic writes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{SitepackError, SitepackResult};

/// Abstract file system interface.
pub trait FileSystem {
    /// Read file content. Missing files surface as `NotFound`.
    fn read_to_string(&self, path: &Path) -> SitepackResult<String>;

    /// Read raw file bytes. Missing files surface as `NotFound`.
    fn read(&self, path: &Path) -> SitepackResult<Vec<u8>>;

    /// Write file content atomically, creating parent directories.
    fn write_atomic(&self, path: &Path, content: &[u8]) -> SitepackResult<()>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Compute SHA-256 hash of file content.
    fn hash_file(&self, path: &Path) -> SitepackResult<String>;

    /// Create directory and parents. Idempotent.
    fn create_dir_all(&self, path: &Path) -> SitepackResult<()>;

    /// List files under a directory recursively.
    ///
    /// Paths are relative to `root`, sorted, with hidden (dot-prefixed)
    /// entries skipped.
    fn walk_files(&self, root: &Path) -> SitepackResult<Vec<PathBuf>>;
}

/// Compute the SHA-256 hash of in-memory content.
///
/// Same format as `FileSystem::hash_file`, for comparing a would-be write
/// against what is already on disk.
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{:x}", hasher.finalize())
}

fn not_found_or_io(path: &Path, e: std::io::Error) -> SitepackError {
    if e.kind() == std::io::ErrorKind::NotFound {
        SitepackError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        SitepackError::Io(e)
    }
}

/// Local file system implementation.
///
/// Writes go through a tempfile in the destination's directory followed by
/// a rename, so a crash mid-write never leaves a truncated file behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn read_to_string(&self, path: &Path) -> SitepackResult<String> {
        fs::read_to_string(path).map_err(|e| not_found_or_io(path, e))
    }

    fn read(&self, path: &Path) -> SitepackResult<Vec<u8>> {
        fs::read(path).map_err(|e| not_found_or_io(path, e))
    }

    fn write_atomic(&self, path: &Path, content: &[u8]) -> SitepackResult<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(content)?;
        tmp.persist(path).map_err(|e| SitepackError::Io(e.error))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn hash_file(&self, path: &Path) -> SitepackResult<String> {
        let content = self.read(path)?;
        Ok(hash_content(&content))
    }

    fn create_dir_all(&self, path: &Path) -> SitepackResult<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn walk_files(&self, root: &Path) -> SitepackResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        walk_into(root, Path::new(""), &mut files)?;
        files.sort();
        Ok(files)
    }
}

fn walk_into(dir: &Path, prefix: &Path, out: &mut Vec<PathBuf>) -> SitepackResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| not_found_or_io(dir, e))?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }

        let rel = prefix.join(&name);
        let path = entry.path();
        if path.is_dir() {
            walk_into(&path, &rel, out)?;
        } else {
            out.push(rel);
        }
    }
    Ok(())
}

/// Mock file system for testing.
///
/// Uses `Arc<Mutex<>>` internally so it can be cloned and shared.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockFileSystem {
    files: std::sync::Arc<std::sync::Mutex<std::collections::BTreeMap<PathBuf, Vec<u8>>>>,
}

#[cfg(test)]
impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: &str, content: &str) {
        self.insert_bytes(path, content.as_bytes());
    }

    pub fn insert_bytes(&self, path: &str, content: &[u8]) {
        let mut files = self.files.lock().unwrap();
        files.insert(PathBuf::from(path), content.to_vec());
    }

    pub fn get(&self, path: &str) -> Option<String> {
        let files = self.files.lock().unwrap();
        files
            .get(Path::new(path))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> SitepackResult<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| {
            SitepackError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e.to_string(),
            ))
        })
    }

    fn read(&self, path: &Path) -> SitepackResult<Vec<u8>> {
        let files = self.files.lock().unwrap();
        files
            .get(path)
            .cloned()
            .ok_or_else(|| SitepackError::NotFound {
                path: path.to_path_buf(),
            })
    }

    fn write_atomic(&self, path: &Path, content: &[u8]) -> SitepackResult<()> {
        let mut files = self.files.lock().unwrap();
        files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path) || files.keys().any(|p| p.starts_with(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        !files.contains_key(path) && files.keys().any(|p| p.starts_with(path))
    }

    fn hash_file(&self, path: &Path) -> SitepackResult<String> {
        let content = self.read(path)?;
        Ok(hash_content(&content))
    }

    fn create_dir_all(&self, _path: &Path) -> SitepackResult<()> {
        Ok(())
    }

    fn walk_files(&self, root: &Path) -> SitepackResult<Vec<PathBuf>> {
        let files = self.files.lock().unwrap();
        let mut out = Vec::new();
        for path in files.keys() {
            if let Ok(rel) = path.strip_prefix(root) {
                out.push(rel.to_path_buf());
            }
        }
        Ok(out)
    }
}
