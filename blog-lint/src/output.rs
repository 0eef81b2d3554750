//! Report formatters.
//!
//! JSON for machines, and a plain-text layout that reads like a test runner:
//! one `ok`/`FAILED` line per rule, then the findings of every failed rule.
//! Colour is left to the CLI.

use std::io::Write;

use crate::report::LintReport;

const RULE_WIDTH: usize = 80;

/// Write a `LintReport` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &LintReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Write a `LintReport` as plain text.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &LintReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(writer, "  BLOG CONTENT LINT")?;
    writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(writer)?;
    writeln!(writer, "  Files scanned:  {}", report.scanned_files)?;
    writeln!(writer, "  Files failed:   {}", report.failed_files)?;
    writeln!(writer, "  Rules run:      {}", report.rules.len())?;
    writeln!(writer, "  Findings:       {}", report.findings_count())?;
    writeln!(writer)?;

    for rule in &report.rules {
        let status = if rule.passed { "ok" } else { "FAILED" };
        writeln!(writer, "rule {} ... {status}", rule.id)?;
    }
    writeln!(writer)?;

    if !report.scan_errors.is_empty() {
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(writer, "  SCAN ERRORS (files that could not be checked)")?;
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
        for scan_err in &report.scan_errors {
            writeln!(writer, "{}", scan_err.format_human_readable())?;
        }
        writeln!(writer)?;
    }

    for rule in report.failed_rules() {
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(writer, "  {}: {}", rule.id, rule.description)?;
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
        for finding in &rule.findings {
            writeln!(writer, "{}", finding.format_human_readable())?;
        }
        writeln!(writer, "  hint: {}", rule.hint)?;
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;
    if report.ok {
        writeln!(
            writer,
            "\u{2713} All {} rules passed on {} files",
            report.rules.len(),
            report.scanned_files
        )?;
    } else if !report.scan_errors.is_empty() {
        writeln!(
            writer,
            "\u{2717} {} of {} file(s) could not be scanned; CI must treat this as a failure",
            report.failed_files,
            report.files_attempted()
        )?;
    }
    let failed = report.rules.len() - report.passed_count();
    let outcome = if report.ok { "ok" } else { "FAILED" };
    writeln!(
        writer,
        "lint result: {outcome}. {} passed; {failed} failed",
        report.passed_count()
    )?;
    writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;

    Ok(())
}
