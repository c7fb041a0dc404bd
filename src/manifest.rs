//! Bundle manifest loaded from `sitepack.toml`.
//!
//! The manifest declares everything one build produces: the rendered
//! template, the verbatim copies, the stylesheet pair, an optional fonts
//! subtree and the stamp rewrites applied to published files. All paths
//! are relative; sources resolve against the bundle root, destinations
//! against the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SitepackError, SitepackResult};

/// Manifest filename looked up at the bundle root.
pub const MANIFEST_FILE: &str = "sitepack.toml";

/// Template section: the document rendered with the version token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub file: PathBuf,

    #[serde(default)]
    pub out: Option<PathBuf>,
}

impl TemplateConfig {
    /// Destination relative to the output dir. Defaults to `file`.
    pub fn out_path(&self) -> &Path {
        self.out.as_deref().unwrap_or(&self.file)
    }
}

/// Output section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

/// One verbatim copy into the output tree.
///
/// Supports both bare-string shorthand:
///   copy = ["worker.js", "pkg/engine.wasm"]
///
/// And structured table form:
///   [[copy]]
///   src = "pkg/engine.wasm"
///   dest = "engine.wasm"
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CopyEntry {
    pub src: PathBuf,
    pub dest: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CopyEntryDe {
    Path(PathBuf),
    Table {
        src: PathBuf,
        #[serde(default)]
        dest: Option<PathBuf>,
    },
}

impl<'de> Deserialize<'de> for CopyEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match CopyEntryDe::deserialize(deserializer)? {
            CopyEntryDe::Path(src) => Ok(Self { src, dest: None }),
            CopyEntryDe::Table { src, dest } => Ok(Self { src, dest }),
        }
    }
}

impl CopyEntry {
    /// Destination relative to the output dir. Defaults to `src`.
    pub fn dest_path(&self) -> &Path {
        self.dest.as_deref().unwrap_or(&self.src)
    }
}

/// Styles section: two stylesheets joined into one output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StylesConfig {
    pub primary: PathBuf,
    pub secondary: PathBuf,

    #[serde(default)]
    pub out: Option<PathBuf>,
}

impl StylesConfig {
    /// Destination relative to the output dir. Defaults to `primary`.
    pub fn out_path(&self) -> &Path {
        self.out.as_deref().unwrap_or(&self.primary)
    }
}

/// Fonts section: a subtree copied verbatim under the output dir.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontsConfig {
    pub dir: PathBuf,

    /// Gitignore-style patterns for files left out of the copy.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// One stamp entry: a file in the output tree rewritten in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampConfig {
    /// Target relative to the output dir.
    pub file: PathBuf,

    /// Asset filenames whose quoted references gain a `?<token>` suffix.
    #[serde(default)]
    pub assets: Vec<String>,

    /// Identifier maintained as a leading `var <name> = <token>;` line.
    #[serde(default)]
    pub declare: Option<String>,
}

/// Main manifest structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Manifest {
    #[serde(default)]
    pub template: Option<TemplateConfig>,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub copy: Vec<CopyEntry>,

    #[serde(default)]
    pub styles: Option<StylesConfig>,

    #[serde(default)]
    pub fonts: Option<FontsConfig>,

    #[serde(default)]
    pub stamp: Vec<StampConfig>,
}

/// Non-fatal manifest warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl Manifest {
    /// Load a manifest from a TOML file.
    pub fn load(path: &Path) -> SitepackResult<Self> {
        let (manifest, _warnings) = Self::load_with_warnings(path)?;
        Ok(manifest)
    }

    /// Load a manifest and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> SitepackResult<(Self, Vec<ManifestWarning>)> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SitepackError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                SitepackError::Io(e)
            }
        })?;

        Self::parse_with_warnings(&content, path)
    }

    /// Parse manifest text and collect non-fatal warnings.
    pub fn parse_with_warnings(
        content: &str,
        path: &Path,
    ) -> SitepackResult<(Self, Vec<ManifestWarning>)> {
        let mut unknown_paths: Vec<String> = Vec::new();
        let deserializer = toml::de::Deserializer::new(content);

        let manifest: Self = serde_ignored::deserialize(deserializer, |path| {
            unknown_paths.push(path.to_string());
        })
        .map_err(|e| SitepackError::Manifest {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown_paths
            .into_iter()
            .map(|path_str| {
                let key = path_str
                    .split('.')
                    .last()
                    .unwrap_or(path_str.as_str())
                    .to_string();
                ManifestWarning {
                    key: key.clone(),
                    file: path.to_path_buf(),
                    line: find_line_number(content, &key),
                    suggestion: suggest_key(&key),
                }
            })
            .collect();

        Ok((manifest, warnings))
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "template",
        "file",
        "out",
        "output",
        "dir",
        "copy",
        "src",
        "dest",
        "styles",
        "primary",
        "secondary",
        "fonts",
        "exclude",
        "stamp",
        "assets",
        "declare",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] = std::cmp::min(
                std::cmp::min(prev[j + 1] + 1, curr[j] + 1),
                prev[j] + cost,
            );
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
