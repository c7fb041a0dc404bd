//! Bundle validation without writing.
//!
//! `check` walks the manifest and reports everything it can find wrong
//! before a build is attempted: missing sources, a broken placeholder
//! contract, bad stamp targets, escaping destinations. Unlike the build
//! preflight it does not stop at the first problem.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::fs::{FileSystem, LocalFs};
use crate::manifest::{Manifest, ManifestWarning};
use crate::publish::{build_exclude_matcher, validate_dest};
use crate::stamp;
use crate::template;

/// Status of a bundle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warning,
    Error,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Pass => write!(f, "✓"),
            CheckStatus::Warning => write!(f, "⚠"),
            CheckStatus::Error => write!(f, "✗"),
        }
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleCheck {
    pub area: String,
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub recommendation: Option<String>,
}

/// Check validation results.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub checks: Vec<BundleCheck>,
}

impl CheckReport {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    pub fn passes(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Pass)
            .count()
    }

    pub fn warnings(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Warning)
            .count()
    }

    pub fn errors(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Error)
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.errors() == 0
    }

    pub fn add_pass(&mut self, area: &str, name: &str, message: &str) {
        self.add(area, name, CheckStatus::Pass, message, None);
    }

    pub fn add_warning(&mut self, area: &str, name: &str, message: &str, rec: Option<&str>) {
        self.add(area, name, CheckStatus::Warning, message, rec);
    }

    pub fn add_error(&mut self, area: &str, name: &str, message: &str, rec: Option<&str>) {
        self.add(area, name, CheckStatus::Error, message, rec);
    }

    fn add(&mut self, area: &str, name: &str, status: CheckStatus, message: &str, rec: Option<&str>) {
        self.checks.push(BundleCheck {
            area: area.to_string(),
            name: name.to_string(),
            status,
            message: message.to_string(),
            recommendation: rec.map(String::from),
        });
    }
}

/// Run every check against a bundle on disk.
pub fn run_check(source_root: &Path, manifest_path: &Path) -> CheckReport {
    let mut report = CheckReport::new();

    let (manifest, warnings) = match Manifest::load_with_warnings(manifest_path) {
        Ok(pair) => pair,
        Err(e) => {
            report.add_error(
                "manifest",
                &manifest_path.display().to_string(),
                &e.to_string(),
                Some("run inside the bundle directory or pass --manifest"),
            );
            return report;
        }
    };

    report.add_pass(
        "manifest",
        &manifest_path.display().to_string(),
        "parsed",
    );
    add_manifest_warnings(&mut report, &warnings);

    check_bundle(&manifest, &LocalFs::new(), source_root, &mut report);
    report
}

fn add_manifest_warnings(report: &mut CheckReport, warnings: &[ManifestWarning]) {
    for warning in warnings {
        let message = match warning.line {
            Some(line) => format!("unknown key '{}' (line {})", warning.key, line),
            None => format!("unknown key '{}'", warning.key),
        };
        let rec = warning
            .suggestion
            .as_ref()
            .map(|s| format!("did you mean '{s}'?"));
        report.add_warning("manifest", &warning.key, &message, rec.as_deref());
    }
}

/// Run the bundle checks against a parsed manifest.
pub fn check_bundle(
    manifest: &Manifest,
    fs: &dyn FileSystem,
    source_root: &Path,
    report: &mut CheckReport,
) {
    let output_root = source_root.join(&manifest.output.dir);
    let mut produced: BTreeSet<PathBuf> = BTreeSet::new();
    let mut explicit_dests: Vec<PathBuf> = Vec::new();

    if let Some(template) = &manifest.template {
        check_template(template, fs, source_root, report);
        note_dest(template.out_path(), &output_root, "template", report);
        produced.insert(template.out_path().to_path_buf());
        explicit_dests.push(template.out_path().to_path_buf());
    }

    for entry in &manifest.copy {
        let src = source_root.join(&entry.src);
        let name = entry.src.display().to_string();
        if fs.exists(&src) {
            report.add_pass("copy", &name, "source found");
        } else {
            report.add_error(
                "copy",
                &name,
                &format!("source not found: {}", src.display()),
                Some("fix the path or remove the entry"),
            );
        }
        note_dest(entry.dest_path(), &output_root, "copy", report);
        produced.insert(entry.dest_path().to_path_buf());
        explicit_dests.push(entry.dest_path().to_path_buf());
    }

    if let Some(styles) = &manifest.styles {
        for path in [&styles.primary, &styles.secondary] {
            let src = source_root.join(path);
            let name = path.display().to_string();
            if fs.exists(&src) {
                report.add_pass("styles", &name, "stylesheet found");
            } else {
                report.add_error(
                    "styles",
                    &name,
                    &format!("stylesheet not found: {}", src.display()),
                    None,
                );
            }
        }
        note_dest(styles.out_path(), &output_root, "styles", report);
        produced.insert(styles.out_path().to_path_buf());
        explicit_dests.push(styles.out_path().to_path_buf());
    }

    if let Some(fonts) = &manifest.fonts {
        let dir = source_root.join(&fonts.dir);
        let name = fonts.dir.display().to_string();
        if fs.is_dir(&dir) {
            report.add_pass("fonts", &name, "directory found");
            match build_exclude_matcher(&dir, &fonts.exclude) {
                Ok(matcher) => {
                    if !fonts.exclude.is_empty() {
                        report.add_pass(
                            "fonts",
                            &name,
                            &format!("{} exclude pattern(s) valid", fonts.exclude.len()),
                        );
                    }
                    if let Ok(files) = fs.walk_files(&dir) {
                        for rel in files {
                            if !matcher.matched_path_or_any_parents(&rel, false).is_ignore() {
                                produced.insert(fonts.dir.join(rel));
                            }
                        }
                    }
                }
                Err(e) => report.add_error("fonts", &name, &e.to_string(), None),
            }
        } else {
            report.add_error(
                "fonts",
                &name,
                &format!("directory not found: {}", dir.display()),
                None,
            );
        }
    }

    for entry in &manifest.stamp {
        check_stamp_entry(entry, fs, &output_root, &produced, report);
    }

    check_duplicate_dests(&explicit_dests, report);
}

fn check_template(
    template: &crate::manifest::TemplateConfig,
    fs: &dyn FileSystem,
    source_root: &Path,
    report: &mut CheckReport,
) {
    let src = source_root.join(&template.file);
    let name = template.file.display().to_string();

    if !fs.exists(&src) {
        report.add_error(
            "template",
            &name,
            &format!("not found: {}", src.display()),
            None,
        );
        return;
    }
    report.add_pass("template", &name, "found");

    let content = match fs.read_to_string(&src) {
        Ok(content) => content,
        Err(e) => {
            report.add_error("template", &name, &e.to_string(), None);
            return;
        }
    };

    let names = match template::placeholders(&content, &src) {
        Ok(names) => names,
        Err(e) => {
            report.add_error("template", &name, &e.to_string(), None);
            return;
        }
    };

    for unknown in names.iter().filter(|n| *n != template::VERSION_PLACEHOLDER) {
        report.add_error(
            "template",
            &name,
            &format!("unknown placeholder '{unknown}'"),
            Some("only 'ver' is substituted"),
        );
    }

    match names.iter().filter(|n| *n == template::VERSION_PLACEHOLDER).count() {
        0 => report.add_error(
            "template",
            &name,
            "no 'ver' substitution point; the token never reaches the page",
            Some("add <%= ver %> where the version belongs"),
        ),
        1 => report.add_pass("template", &name, "one 'ver' substitution point"),
        n => report.add_warning(
            "template",
            &name,
            &format!("{n} 'ver' substitution points"),
            None,
        ),
    }
}

fn check_stamp_entry(
    entry: &crate::manifest::StampConfig,
    fs: &dyn FileSystem,
    output_root: &Path,
    produced: &BTreeSet<PathBuf>,
    report: &mut CheckReport,
) {
    let name = entry.file.display().to_string();

    if let Err(e) = validate_dest(&entry.file, output_root) {
        report.add_error("stamp", &name, &e.to_string(), None);
        return;
    }

    if produced.contains(&entry.file) || fs.exists(&output_root.join(&entry.file)) {
        report.add_pass("stamp", &name, "target produced or published");
    } else {
        report.add_error(
            "stamp",
            &name,
            "target is neither produced by the build nor present in the output",
            Some("add a copy or template entry producing it"),
        );
    }

    if let Some(declare) = &entry.declare {
        if stamp::is_valid_identifier(declare) {
            report.add_pass("stamp", &name, &format!("declares '{declare}'"));
        } else {
            report.add_error(
                "stamp",
                &name,
                &format!("'{declare}' is not a valid identifier"),
                None,
            );
        }
    }

    if entry.assets.is_empty() && entry.declare.is_none() {
        report.add_warning(
            "stamp",
            &name,
            "entry has no assets and no declare, it does nothing",
            Some("remove it or add assets"),
        );
    }
}

fn note_dest(dest: &Path, output_root: &Path, area: &str, report: &mut CheckReport) {
    if let Err(e) = validate_dest(dest, output_root) {
        report.add_error(area, &dest.display().to_string(), &e.to_string(), None);
    }
}

fn check_duplicate_dests(dests: &[PathBuf], report: &mut CheckReport) {
    let mut seen: BTreeSet<&PathBuf> = BTreeSet::new();
    let mut flagged: BTreeSet<&PathBuf> = BTreeSet::new();

    for dest in dests {
        if !seen.insert(dest) && flagged.insert(dest) {
            report.add_error(
                "output",
                &dest.display().to_string(),
                "more than one entry writes this destination",
                Some("give one of them an explicit dest/out"),
            );
        }
    }
}
