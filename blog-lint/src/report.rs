//! Lint report types.

use serde::Serialize;

use crate::error::{Finding, ScanError};

/// Outcome of one rule, the unit a test runner would report.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct RuleResult {
    /// Stable kebab-case rule id.
    pub id: String,
    /// One-line description of the convention the rule checks.
    pub description: String,
    /// How to fix a violation.
    pub hint: String,
    /// Whether the rule produced no findings.
    pub passed: bool,
    /// Every violation found by the rule.
    pub findings: Vec<Finding>,
}

/// Result of a lint run.
///
/// CI pipelines must check both the rule results and `scan_errors`.
/// A non-empty `scan_errors` means the linter did not see the whole site;
/// treat this as a build failure regardless of rule results.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct LintReport {
    /// Number of files successfully scanned (content read, or image listed).
    pub scanned_files: usize,
    /// Number of files that could not be scanned.
    pub failed_files: usize,
    /// Whether every rule passed AND no scan errors occurred.
    pub ok: bool,
    /// One entry per rule that ran, in catalog order.
    pub rules: Vec<RuleResult>,
    /// Scan-level errors: files that could not be read.
    pub scan_errors: Vec<ScanError>,
}

impl LintReport {
    /// Total number of files attempted (scanned + failed).
    #[must_use]
    pub fn files_attempted(&self) -> usize {
        self.scanned_files + self.failed_files
    }

    /// Number of findings across all rules.
    #[must_use]
    pub fn findings_count(&self) -> usize {
        self.rules.iter().map(|r| r.findings.len()).sum()
    }

    /// Number of rules that passed.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.rules.iter().filter(|r| r.passed).count()
    }

    /// Rules that produced at least one finding.
    pub fn failed_rules(&self) -> impl Iterator<Item = &RuleResult> {
        self.rules.iter().filter(|r| !r.passed)
    }

    /// All findings, in rule order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.rules.iter().flat_map(|r| r.findings.iter())
    }
}
