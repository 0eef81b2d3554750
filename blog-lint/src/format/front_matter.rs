//! YAML front-matter splitting and parsing.
//!
//! Jekyll only treats a file as content when its very first line is `---`.
//! The block ends at the next `---` (or `...`) line. The block is parsed with
//! the YAML parser into `serde_json::Value` so rules can inspect it without
//! caring about YAML specifics.

use serde_json::{Map, Value};
use thiserror::Error;

/// Front-matter delimiter line.
pub const DELIMITER: &str = "---";

/// Parsed front matter: string keys to scalar, array, or mapping values.
pub type FrontMatter = Map<String, Value>;

/// Why a document's front matter is unusable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrontMatterError {
    /// The first line is not `---`.
    #[error("missing front matter: first line must be '---'")]
    Missing,
    /// No closing `---` line.
    #[error("front matter is not terminated by a closing '---' line")]
    Unterminated,
    /// The block is not valid YAML.
    #[error("front matter is not valid YAML: {0}")]
    Yaml(String),
    /// The block is valid YAML but not a mapping.
    #[error("front matter must be a mapping of fields, got {0}")]
    NotMapping(&'static str),
}

/// A document split into its front matter and body.
#[derive(Debug, Clone)]
pub struct SplitDocument<'a> {
    /// The parsed front matter, or why it is unusable.
    pub front_matter: Result<FrontMatter, FrontMatterError>,
    /// Text after the closing delimiter (the whole text when there is no front matter).
    pub body: &'a str,
    /// Number of lines preceding the body, so body line numbers can be
    /// reported relative to the file.
    pub body_line_offset: usize,
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

fn is_closing_delimiter(line: &str) -> bool {
    let line = line.trim_end();
    line == DELIMITER || line == "..."
}

/// Split `content` into front matter and body, then parse the front matter.
#[must_use]
pub fn split_front_matter(content: &str) -> SplitDocument<'_> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut lines = content.split_inclusive('\n');
    if !lines.next().is_some_and(is_delimiter) {
        return SplitDocument {
            front_matter: Err(FrontMatterError::Missing),
            body: content,
            body_line_offset: 0,
        };
    }

    let yaml_start = content.find('\n').map_or(content.len(), |i| i + 1);
    let mut offset = yaml_start;
    let mut line_count = 1;
    for line in lines {
        line_count += 1;
        if is_closing_delimiter(line) {
            let yaml = &content[yaml_start..offset];
            let body = &content[offset + line.len()..];
            return SplitDocument {
                front_matter: parse_front_matter(yaml),
                body,
                body_line_offset: line_count,
            };
        }
        offset += line.len();
    }

    SplitDocument {
        front_matter: Err(FrontMatterError::Unterminated),
        body: content,
        body_line_offset: 0,
    }
}

/// Parse the YAML between the delimiters. An empty block is an empty mapping.
///
/// # Errors
///
/// Returns [`FrontMatterError::Yaml`] for invalid YAML and
/// [`FrontMatterError::NotMapping`] when the top level is not a mapping.
pub fn parse_front_matter(yaml: &str) -> Result<FrontMatter, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::new());
    }
    let value: Value =
        serde_saphyr::from_str(yaml).map_err(|e| FrontMatterError::Yaml(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(FrontMatter::new()),
        Value::Array(_) => Err(FrontMatterError::NotMapping("a list")),
        Value::String(_) => Err(FrontMatterError::NotMapping("a string")),
        Value::Number(_) => Err(FrontMatterError::NotMapping("a number")),
        Value::Bool(_) => Err(FrontMatterError::NotMapping("a boolean")),
    }
}

/// Whether a front-matter value counts as present: not null, not an empty
/// (or whitespace-only) string, not an empty list or mapping.
#[must_use]
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Render a scalar value as text (strings unquoted); `None` for lists,
/// mappings, and null.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Read a field holding either one string or a list of strings.
///
/// # Errors
///
/// Returns a description of the first item that is not a string.
pub fn string_list(value: &Value) -> Result<Vec<String>, String> {
    match value {
        Value::String(s) => Ok(s.split_whitespace().map(str::to_owned).collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(format!("expected a string, got {other}")),
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(format!("expected a string or a list of strings, got {other}")),
    }
}
