//! Sitepack CLI - version stamper and asset publisher
//!
//! Usage: sitepack <COMMAND>
//!
//! Commands:
//!   build   Publish the bundle with a fresh version token
//!   check   Validate the manifest and bundle without writing

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use sitepack::report::OutputFormat;

/// Sitepack - version stamper and asset publisher for static web bundles
#[derive(Parser, Debug)]
#[command(name = "sitepack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Publish the bundle with a fresh version token
    Build {
        /// Path to the bundle directory
        #[arg(short, long, default_value = ".")]
        source: PathBuf,

        /// Path to the manifest (defaults to <source>/sitepack.toml)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Output directory (overrides the manifest)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Explicit version token for reproducible builds
        #[arg(long)]
        token: Option<u64>,

        /// Dry run - show what would be done
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the manifest and bundle without writing
    Check {
        /// Path to the bundle directory
        #[arg(short, long, default_value = ".")]
        source: PathBuf,

        /// Path to the manifest (defaults to <source>/sitepack.toml)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            source,
            manifest,
            out,
            token,
            dry_run,
        } => cmd_build(&source, manifest, out, token, dry_run, cli.json, cli.verbose),
        Commands::Check { source, manifest } => {
            cmd_check(&source, manifest, cli.json, cli.verbose)
        }
    }
}

fn manifest_path(source: &Path, explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| source.join(sitepack::manifest::MANIFEST_FILE))
}

fn cmd_build(
    source: &Path,
    manifest: Option<PathBuf>,
    out: Option<PathBuf>,
    token: Option<u64>,
    dry_run: bool,
    json: bool,
    verbose: u8,
) -> Result<()> {
    use sitepack::publish::{plan_bundle, BuildOptions};
    use sitepack::token::{RandomTokens, TokenSource, VersionToken};

    if !json {
        println!("📦 Sitepack Build");
        println!("Source: {}", source.display());
        if dry_run {
            println!("Mode: Dry run");
        }
        println!();
    }

    let manifest_path = manifest_path(source, manifest);
    let (manifest, warnings) =
        sitepack::manifest::Manifest::load_with_warnings(&manifest_path)?;

    if !json {
        for warning in &warnings {
            match &warning.suggestion {
                Some(s) => println!(
                    "⚠ unknown manifest key '{}' (did you mean '{}'?)",
                    warning.key, s
                ),
                None => println!("⚠ unknown manifest key '{}'", warning.key),
            }
        }
        if !warnings.is_empty() {
            println!();
        }
    }

    let fs = sitepack::fs::LocalFs::new();
    let plan = plan_bundle(&manifest, &fs, source, out.as_deref())?;

    let token = match token {
        Some(value) => VersionToken::new(value),
        None => RandomTokens::new().next_token(),
    };

    let result = plan.execute(&fs, token, &BuildOptions { dry_run })?;

    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let renderer = sitepack::report::create_renderer(format, verbose);
    renderer.render_build(&result, source, &plan.output_root, dry_run);

    Ok(())
}

fn cmd_check(source: &Path, manifest: Option<PathBuf>, json: bool, verbose: u8) -> Result<()> {
    use sitepack::check::run_check;

    if !json {
        println!("🩺 Sitepack Check");
        println!("Source: {}", source.display());
        println!();
    }

    let manifest_path = manifest_path(source, manifest);
    let report = run_check(source, &manifest_path);

    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let renderer = sitepack::report::create_renderer(format, verbose);
    renderer.render_check(&report);

    if !report.is_success() {
        if !json {
            println!();
            println!("🔴 Check found issues. Fix the errors and re-run.");
        }
        std::process::exit(1);
    } else if report.warnings() > 0 {
        if !json {
            println!();
            println!("🟡 Check passed with warnings.");
        }
    } else if !json {
        println!();
        println!("🟢 Bundle looks good!");
    }

    Ok(())
}
