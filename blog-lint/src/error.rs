//! Error and finding types for blog linting.

use std::path::PathBuf;

use serde::Serialize;

/// The kind of scan-level failure that prevented a file from being checked.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScanErrorKind {
    /// An I/O error occurred while reading the file.
    IoError,
    /// The file exceeded the configured maximum size limit.
    FileTooLarge,
    /// The file content is not valid UTF-8.
    InvalidEncoding,
    /// The resolved path is outside the site root (symlink escape).
    OutsideSite,
    /// A resource limit (`max_files` or `max_total_bytes`) was reached, truncating the scan.
    LimitExceeded,
    /// A directory traversal error (permission denied, loop detected, etc.).
    WalkError,
    /// An exclude glob pattern could not be parsed.
    InvalidExcludePattern,
}

/// A scan-level error: a file that could not be checked at all.
///
/// These are distinct from [`Finding`] (a rule violation in content that was
/// read). A `ScanError` means the linter did not see the whole site, so CI
/// must treat it as a failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ScanError {
    /// The file path that could not be scanned.
    pub file: PathBuf,
    /// The kind of failure.
    pub kind: ScanErrorKind,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ScanError {
    pub(crate) fn new(file: impl Into<PathBuf>, kind: ScanErrorKind, message: String) -> Self {
        Self {
            file: file.into(),
            kind,
            message,
        }
    }

    /// Format the error for human-readable output.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        format!("{}: [scan error] {}", self.file.display(), self.message)
    }
}

/// A single rule violation found in a content file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct Finding {
    /// Id of the rule that produced this finding.
    pub rule: String,
    /// Site-relative path of the offending file.
    pub file: PathBuf,
    /// Line number (1-indexed) for body references; 0 when not line-based.
    pub line: usize,
    /// Column number (1-indexed) for body references; 0 when not line-based.
    pub column: usize,
    /// Front-matter field the finding is about; empty when not field-based.
    pub field: String,
    /// The offending value as written (filename, field value, reference).
    pub value: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Finding {
    /// A finding about a whole file.
    #[must_use]
    pub fn new(rule: &str, file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_owned(),
            file: file.into(),
            line: 0,
            column: 0,
            field: String::new(),
            value: String::new(),
            message: message.into(),
        }
    }

    /// Attach a 1-indexed line/column position.
    #[must_use]
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Attach the front-matter field the finding is about.
    #[must_use]
    pub fn field(mut self, field: &str) -> Self {
        field.clone_into(&mut self.field);
        self
    }

    /// Attach the offending value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Format the finding for human-readable output.
    ///
    /// Body findings: `{file}:{line}:{column}: {message} [{value}]`
    /// Field findings: `{file}: {message} [{value}] (at {field})`
    /// File findings: `{file}: {message}` plus `[{value}]` when a value is set.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        let value = if self.value.is_empty() {
            String::new()
        } else {
            format!(" [{}]", self.value)
        };

        if self.line > 0 && self.column > 0 {
            format!(
                "{}:{}:{}: {}{value}",
                self.file.display(),
                self.line,
                self.column,
                self.message
            )
        } else if !self.field.is_empty() {
            format!(
                "{}: {}{value} (at {})",
                self.file.display(),
                self.message,
                self.field
            )
        } else {
            format!("{}: {}{value}", self.file.display(), self.message)
        }
    }
}
