//! Output rendering.
//!
//! Build and check results render either as human-readable text or as one
//! pretty-printed JSON object for scripting. Unicode icons degrade to
//! ASCII when stdout is not a terminal.

use std::path::Path;

use is_terminal::IsTerminal;

use crate::check::{CheckReport, CheckStatus};
use crate::publish::PublishResult;

/// Output format for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Icons for output rendering.
struct Icons {
    check: &'static str,
    cross: &'static str,
    warn: &'static str,
    write: &'static str,
    skip: &'static str,
    stamp: &'static str,
    hint: &'static str,
}

impl Icons {
    fn unicode() -> Self {
        Self {
            check: "✓",
            cross: "✗",
            warn: "⚠",
            write: "→",
            skip: "○",
            stamp: "✎",
            hint: "↳",
        }
    }

    fn ascii() -> Self {
        Self {
            check: "[OK]",
            cross: "[FAIL]",
            warn: "[!]",
            write: "->",
            skip: "[ ]",
            stamp: "[~]",
            hint: ">",
        }
    }
}

/// Trait for rendering command results.
pub trait ResultRenderer {
    /// Render the result of a build run.
    fn render_build(&self, result: &PublishResult, source: &Path, output: &Path, dry_run: bool);

    /// Render a check report.
    fn render_check(&self, report: &CheckReport);
}

/// Text renderer.
pub struct TextRenderer {
    /// Whether to use unicode icons
    pub unicode: bool,
    /// Verbosity level
    pub verbose: u8,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            unicode: true,
            verbose: 0,
        }
    }
}

impl TextRenderer {
    fn icons(&self) -> Icons {
        if self.unicode {
            Icons::unicode()
        } else {
            Icons::ascii()
        }
    }
}

impl ResultRenderer for TextRenderer {
    fn render_build(&self, result: &PublishResult, source: &Path, output: &Path, dry_run: bool) {
        let icons = self.icons();

        if dry_run {
            println!("{} Dry Run Complete", icons.check);
        } else if result.written.is_empty() && result.stamped.is_empty() {
            println!("{} Already Up-to-date", icons.check);
        } else {
            println!("{} Publish Complete", icons.check);
        }

        println!();
        println!("  Source: {}", source.display());
        println!("  Output: {}", output.display());
        println!("  Token:  {}", result.token);

        if !result.written.is_empty() {
            println!();
            println!("  Written ({}):", result.written.len());
            for path in &result.written {
                println!("    {} {}", icons.write, path);
            }
        }

        if !result.skipped.is_empty() {
            println!();
            if self.verbose > 0 {
                println!("  Skipped ({}):", result.skipped.len());
                for path in &result.skipped {
                    println!("    {} {}", icons.skip, path);
                }
            } else {
                println!("  {} file(s) already up-to-date", result.skipped.len());
            }
        }

        if !result.stamped.is_empty() {
            println!();
            println!("  Stamped ({}):", result.stamped.len());
            for path in &result.stamped {
                println!("    {} {}", icons.stamp, path);
            }
        }
    }

    fn render_check(&self, report: &CheckReport) {
        let icons = self.icons();
        let mut current_area = String::new();

        for check in &report.checks {
            if check.area != current_area {
                if !current_area.is_empty() {
                    println!();
                }
                println!("{}", check.area);
                current_area = check.area.clone();
            }

            let icon = match check.status {
                CheckStatus::Pass => icons.check,
                CheckStatus::Warning => icons.warn,
                CheckStatus::Error => icons.cross,
            };

            println!("  {} {} - {}", icon, check.name, check.message);

            if let Some(rec) = &check.recommendation {
                println!("    {} {}", icons.hint, rec);
            }
        }

        println!();
        println!(
            "Summary: {} passed, {} warnings, {} errors",
            report.passes(),
            report.warnings(),
            report.errors()
        );
    }
}

/// JSON renderer.
pub struct JsonRenderer;

impl ResultRenderer for JsonRenderer {
    fn render_build(&self, result: &PublishResult, source: &Path, output: &Path, dry_run: bool) {
        // The token is a string on the wire: 16 digits overflow the safe
        // integer range of most JSON consumers.
        let json = serde_json::json!({
            "success": true,
            "dry_run": dry_run,
            "source": source.display().to_string(),
            "output": output.display().to_string(),
            "token": result.token.to_string(),
            "written": result.written,
            "skipped": result.skipped,
            "stamped": result.stamped,
        });

        println!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_default()
        );
    }

    fn render_check(&self, report: &CheckReport) {
        let checks: Vec<_> = report
            .checks
            .iter()
            .map(|c| {
                serde_json::json!({
                    "area": c.area,
                    "name": c.name,
                    "status": status_str(c.status),
                    "message": c.message,
                    "recommendation": c.recommendation,
                })
            })
            .collect();

        let json = serde_json::json!({
            "success": report.is_success(),
            "passes": report.passes(),
            "warnings": report.warnings(),
            "errors": report.errors(),
            "checks": checks,
        });

        println!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_default()
        );
    }
}

fn status_str(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "pass",
        CheckStatus::Warning => "warning",
        CheckStatus::Error => "error",
    }
}

/// Create a renderer based on format.
///
/// Text output uses unicode icons only when stdout is a terminal.
pub fn create_renderer(format: OutputFormat, verbose: u8) -> Box<dyn ResultRenderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer {
            unicode: std::io::stdout().is_terminal(),
            verbose,
        }),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}
