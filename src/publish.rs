//! Build pipeline: resolve the manifest into a plan, then execute it.
//!
//! Planning does the fail-fast validation. Every declared source must
//! exist, every destination must stay inside the output root and every
//! stamped file must be produced by the build or already published,
//! checked before anything is written. Execution then runs the steps in
//! order against the file system.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{SitepackError, SitepackResult};
use crate::fs::{hash_content, FileSystem};
use crate::manifest::Manifest;
use crate::stamp;
use crate::template;
use crate::token::VersionToken;

/// One planned write into the output tree.
///
/// Source paths are resolved against the bundle root; destinations stay
/// relative to the output root until execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStep {
    /// Render the template with the version token.
    Render { src: PathBuf, dest: PathBuf },
    /// Copy bytes unchanged.
    Copy { src: PathBuf, dest: PathBuf },
    /// Join the stylesheet pair, primary first.
    Concat {
        primary: PathBuf,
        secondary: PathBuf,
        dest: PathBuf,
    },
    /// Rewrite a published file in place.
    Stamp {
        dest: PathBuf,
        assets: Vec<String>,
        declare: Option<String>,
    },
}

/// Result of planning a build.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub output_root: PathBuf,
    pub steps: Vec<BuildStep>,
}

impl BuildPlan {
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Options for a build run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Report the planned actions without writing.
    pub dry_run: bool,
}

/// Result of one build run.
#[derive(Debug, Clone)]
pub struct PublishResult {
    pub token: VersionToken,
    /// Destinations written (relative to the output root).
    pub written: Vec<String>,
    /// Destinations skipped as already up to date.
    pub skipped: Vec<String>,
    /// Destinations rewritten in place.
    pub stamped: Vec<String>,
}

/// Reject destinations that would land outside the output root.
///
/// Destinations must be relative and may never traverse above the root.
/// Checked on path components, not on the disk, since destinations
/// usually do not exist yet at plan time.
pub fn validate_dest(path: &Path, root: &Path) -> SitepackResult<()> {
    let escape = || SitepackError::PathEscape {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    };

    if path.is_absolute() {
        return Err(escape());
    }

    let mut depth = 0i32;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return Err(escape());
                }
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return Err(escape()),
        }
    }

    Ok(())
}

/// Build a gitignore-style matcher for fonts `exclude` patterns.
///
/// Patterns are matched relative to the fonts directory.
pub fn build_exclude_matcher(root: &Path, patterns: &[String]) -> SitepackResult<Gitignore> {
    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        builder
            .add_line(None, pattern)
            .map_err(|e| SitepackError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
    }

    builder.build().map_err(|e| SitepackError::InvalidPattern {
        pattern: patterns.join(" "),
        message: e.to_string(),
    })
}

/// Resolve a manifest into an ordered build plan.
///
/// Step order is fixed: template render, declared copies, fonts copies
/// (sorted), stylesheet concat, stamps. A failed preflight check means
/// nothing gets written.
pub fn plan_bundle(
    manifest: &Manifest,
    fs: &dyn FileSystem,
    source_root: &Path,
    out_override: Option<&Path>,
) -> SitepackResult<BuildPlan> {
    let output_root = match out_override {
        Some(dir) => dir.to_path_buf(),
        None => source_root.join(&manifest.output.dir),
    };

    let mut steps = Vec::new();
    let mut produced: BTreeSet<PathBuf> = BTreeSet::new();

    if let Some(template) = &manifest.template {
        let src = source_root.join(&template.file);
        if !fs.exists(&src) {
            return Err(SitepackError::NotFound { path: src });
        }
        let dest = template.out_path().to_path_buf();
        validate_dest(&dest, &output_root)?;
        produced.insert(dest.clone());
        steps.push(BuildStep::Render { src, dest });
    }

    for entry in &manifest.copy {
        let src = source_root.join(&entry.src);
        if !fs.exists(&src) {
            return Err(SitepackError::NotFound { path: src });
        }
        let dest = entry.dest_path().to_path_buf();
        validate_dest(&dest, &output_root)?;
        produced.insert(dest.clone());
        steps.push(BuildStep::Copy { src, dest });
    }

    if let Some(fonts) = &manifest.fonts {
        let src_root = source_root.join(&fonts.dir);
        if !fs.is_dir(&src_root) {
            return Err(SitepackError::NotFound { path: src_root });
        }

        let matcher = build_exclude_matcher(&src_root, &fonts.exclude)?;
        for rel in fs.walk_files(&src_root)? {
            if matcher.matched_path_or_any_parents(&rel, false).is_ignore() {
                continue;
            }
            let dest = fonts.dir.join(&rel);
            validate_dest(&dest, &output_root)?;
            produced.insert(dest.clone());
            steps.push(BuildStep::Copy {
                src: src_root.join(&rel),
                dest,
            });
        }
    }

    if let Some(styles) = &manifest.styles {
        let primary = source_root.join(&styles.primary);
        let secondary = source_root.join(&styles.secondary);
        for path in [&primary, &secondary] {
            if !fs.exists(path) {
                return Err(SitepackError::NotFound { path: path.clone() });
            }
        }
        let dest = styles.out_path().to_path_buf();
        validate_dest(&dest, &output_root)?;
        produced.insert(dest.clone());
        steps.push(BuildStep::Concat {
            primary,
            secondary,
            dest,
        });
    }

    for entry in &manifest.stamp {
        validate_dest(&entry.file, &output_root)?;
        if !produced.contains(&entry.file) && !fs.exists(&output_root.join(&entry.file)) {
            return Err(SitepackError::NotFound {
                path: output_root.join(&entry.file),
            });
        }
        steps.push(BuildStep::Stamp {
            dest: entry.file.clone(),
            assets: entry.assets.clone(),
            declare: entry.declare.clone(),
        });
    }

    Ok(BuildPlan { output_root, steps })
}

impl BuildPlan {
    /// Run the steps in order, threading one token through every write.
    ///
    /// Verbatim copies whose destination already holds identical bytes are
    /// skipped. With `dry_run` set nothing is written; stamp steps are
    /// recorded without reading, since their input may not exist yet.
    pub fn execute(
        &self,
        fs: &dyn FileSystem,
        token: VersionToken,
        options: &BuildOptions,
    ) -> SitepackResult<PublishResult> {
        let mut result = PublishResult {
            token,
            written: Vec::new(),
            skipped: Vec::new(),
            stamped: Vec::new(),
        };

        if !options.dry_run {
            fs.create_dir_all(&self.output_root)?;
        }

        for step in &self.steps {
            match step {
                BuildStep::Render { src, dest } => {
                    let rendered = template::render(fs, src, token)?;
                    if !options.dry_run {
                        fs.write_atomic(&self.output_root.join(dest), rendered.as_bytes())?;
                    }
                    result.written.push(dest.display().to_string());
                }
                BuildStep::Copy { src, dest } => {
                    let bytes = fs.read(src)?;
                    let dest_abs = self.output_root.join(dest);
                    if fs.exists(&dest_abs) && fs.hash_file(&dest_abs)? == hash_content(&bytes) {
                        result.skipped.push(dest.display().to_string());
                        continue;
                    }
                    if !options.dry_run {
                        fs.write_atomic(&dest_abs, &bytes)?;
                    }
                    result.written.push(dest.display().to_string());
                }
                BuildStep::Concat {
                    primary,
                    secondary,
                    dest,
                } => {
                    let joined = stamp::concat_files(fs, primary, secondary)?;
                    if !options.dry_run {
                        fs.write_atomic(&self.output_root.join(dest), joined.as_bytes())?;
                    }
                    result.written.push(dest.display().to_string());
                }
                BuildStep::Stamp {
                    dest,
                    assets,
                    declare,
                } => {
                    if options.dry_run {
                        result.stamped.push(dest.display().to_string());
                        continue;
                    }

                    let dest_abs = self.output_root.join(dest);
                    let mut text = fs.read_to_string(&dest_abs)?;
                    if let Some(name) = declare {
                        text = stamp::ensure_version_declaration(&text, name, token);
                    }
                    for asset in assets {
                        text = stamp::stamp_references(&text, asset, token);
                    }
                    fs.write_atomic(&dest_abs, text.as_bytes())?;
                    result.stamped.push(dest.display().to_string());
                }
            }
        }

        Ok(result)
    }
}
