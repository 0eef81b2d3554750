use std::io::Write;
use std::path::PathBuf;

use blog_lint::output::{write_human, write_json};
use blog_lint::{LintConfig, LintReport, lint_site, rules};
use clap::{Parser, ValueEnum};
use colored::Colorize;

/// Exit status for usage, config, and I/O errors.
pub const USAGE_EXIT_CODE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "blog-lint",
    version,
    about = "Check a Jekyll blog's posts, profiles, and images against the house conventions"
)]
pub struct Args {
    /// Root of the Jekyll site
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Config file (default: <ROOT>/.blog-lint.yaml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run only this rule (repeatable)
    #[arg(long = "rule", value_name = "ID")]
    pub rules: Vec<String>,

    /// Skip this rule (repeatable)
    #[arg(long = "skip", value_name = "ID")]
    pub skip: Vec<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// List the available rules and exit
    #[arg(long)]
    pub list_rules: bool,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// How a completed run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every rule passed and every file was scanned.
    Clean,
    /// At least one finding or scan error.
    Failed,
}

impl Outcome {
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::Failed => 1,
        }
    }
}

/// Load the config for a run: explicit file, else discovery under the root,
/// then the command-line rule selection on top.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed.
pub fn load_config(args: &Args) -> anyhow::Result<LintConfig> {
    let mut config = match &args.config {
        Some(path) => LintConfig::load(path)?,
        None => LintConfig::discover(&args.root)?,
    };
    if !args.rules.is_empty() {
        config.rules.only.clone_from(&args.rules);
    }
    config.rules.skip.extend(args.skip.iter().cloned());
    Ok(config)
}

/// Run the linter as the command line asks, writing the report to `out`.
///
/// # Errors
///
/// Returns an error for an unusable root, a bad config, an unknown rule id,
/// or a failed write.
pub fn run(args: &Args, out: &mut dyn Write) -> anyhow::Result<Outcome> {
    if args.no_color {
        colored::control::set_override(false);
    }

    if args.list_rules {
        write_rule_list(out)?;
        return Ok(Outcome::Clean);
    }

    let config = load_config(args)?;
    tracing::info!(root = %args.root.display(), "linting site");
    let report = lint_site(&args.root, &config)?;

    match args.format {
        OutputFormat::Json => write_json(&report, out)?,
        OutputFormat::Human => write_colored_human(&report, out)?,
    }

    Ok(if report.ok {
        Outcome::Clean
    } else {
        Outcome::Failed
    })
}

fn write_rule_list(out: &mut dyn Write) -> anyhow::Result<()> {
    let width = rules::catalog()
        .iter()
        .map(|rule| rule.id.len())
        .max()
        .unwrap_or(0);
    for rule in rules::catalog() {
        writeln!(out, "{:<width$}  {}", rule.id, rule.description)?;
    }
    Ok(())
}

/// The plain-text report with status words coloured.
fn write_colored_human(report: &LintReport, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut plain = Vec::new();
    write_human(report, &mut plain)?;
    let text = String::from_utf8_lossy(&plain);

    for line in text.lines() {
        if let Some(rule) = line.strip_suffix(" ... ok") {
            writeln!(out, "{rule} ... {}", "ok".green())?;
        } else if let Some(rule) = line.strip_suffix(" ... FAILED") {
            writeln!(out, "{rule} ... {}", "FAILED".red())?;
        } else if line.starts_with('\u{2713}') || line.starts_with("lint result: ok") {
            writeln!(out, "{}", line.green().bold())?;
        } else if line.starts_with('\u{2717}') || line.starts_with("lint result: FAILED") {
            writeln!(out, "{}", line.red().bold())?;
        } else if line.trim_start().starts_with("hint:") {
            writeln!(out, "{}", line.dimmed())?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}
