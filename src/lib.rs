//! Sitepack - cache-busting version stamper and asset publisher
//!
//! Sitepack takes a prebuilt static web bundle (HTML entry point, worker
//! scripts, wasm modules, stylesheets, fonts) and publishes it to an output
//! directory with a fresh version token baked into the page, the asset
//! references and a leading script declaration, so browsers never serve a
//! stale mix after a deploy.

pub mod check;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod publish;
pub mod report;
pub mod stamp;
pub mod template;
pub mod token;

// Re-exports for convenience
pub use check::{run_check, BundleCheck, CheckReport, CheckStatus};
pub use error::{SitepackError, SitepackResult};
pub use fs::{FileSystem, LocalFs};
pub use manifest::{Manifest, ManifestWarning};
pub use publish::{plan_bundle, BuildOptions, BuildPlan, BuildStep, PublishResult};
pub use report::{create_renderer, OutputFormat, ResultRenderer};
pub use token::{RandomTokens, TokenSource, VersionToken};
