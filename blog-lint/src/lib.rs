//! # blog-lint
//!
//! Content checks for a Jekyll blog checkout: post and profile naming,
//! front-matter fields, image references, image sizes, and internal links.
//!
//! The site is read once into a [`Site`] snapshot; every rule in the
//! [`rules::catalog`] then runs independently over it and reports its own
//! pass/fail outcome with findings.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use blog_lint::{LintConfig, lint_site};
//!
//! let root = Path::new("my-blog");
//! let config = LintConfig::discover(root).unwrap();
//! let report = lint_site(root, &config).unwrap();
//! for rule in &report.rules {
//!     println!("{}: {}", rule.id, if rule.passed { "ok" } else { "FAILED" });
//! }
//! println!("OK: {}", report.ok);
//! ```

mod config;
mod error;
pub mod format;
mod images;
mod normalize;
pub mod output;
mod report;
pub mod rules;
mod site;
mod strategy;

use std::path::Path;

pub use config::{CONFIG_FILE_NAME, LintConfig, RuleConfig, SiteLayout};
pub use error::{Finding, ScanError, ScanErrorKind};
pub use report::{LintReport, RuleResult};
pub use site::{Document, Site};

/// Lint the Jekyll site rooted at `root`.
///
/// This is the primary public API.
///
/// # Errors
///
/// Returns an error if `root` does not exist or is not a directory, or if
/// the rule selection names an unknown rule. Unreadable content files are
/// not errors: they are reported in `report.scan_errors`.
pub fn lint_site(root: &Path, config: &LintConfig) -> anyhow::Result<LintReport> {
    if !root.exists() {
        anyhow::bail!("Site root does not exist: {}", root.display());
    }
    if !root.is_dir() {
        anyhow::bail!("Site root is not a directory: {}", root.display());
    }

    // Reject a bad selection before touching the content.
    rules::select_rules(&config.rules)?;

    let site = Site::load(root, &config.layout);
    let results = rules::run_rules(&site, &config.rules)?;

    let ok = results.iter().all(|r| r.passed) && site.scan_errors.is_empty();
    Ok(LintReport {
        scanned_files: site.scanned_files,
        failed_files: site.scan_errors.len(),
        ok,
        rules: results,
        scan_errors: site.scan_errors,
    })
}
