//! Markdown body scanner for embedded references.
//!
//! Finds image references (`![alt](src)`, `<img src="...">`) and Liquid link
//! tags (`{% post_url NAME %}`, `{% link PATH %}`) line by line, skipping
//! fenced code blocks and inline code spans.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// What kind of reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReferenceKind {
    /// An image embedded with Markdown or HTML syntax.
    Image,
    /// A `{% post_url NAME %}` tag naming another post.
    PostUrl,
    /// A `{% link PATH %}` tag naming a site file.
    Link,
}

/// A reference found in a document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Reference kind.
    pub kind: ReferenceKind,
    /// The target exactly as written.
    pub raw: String,
    /// Line number in the file (1-indexed).
    pub line: usize,
    /// Column of the whole match in the line (1-indexed, bytes).
    pub column: usize,
}

/// Fence tracking state.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MarkdownState {
    Prose,
    FencedBlock {
        fence_char: char,
        opening_fence_len: usize,
    },
}

fn parse_fence(trimmed_line: &str) -> Option<(char, usize)> {
    let fence_char = match trimmed_line.as_bytes().first() {
        Some(b'`') => '`',
        Some(b'~') => '~',
        _ => return None,
    };

    let fence_len = trimmed_line
        .chars()
        .take_while(|&c| c == fence_char)
        .count();
    (fence_len >= 3).then_some((fence_char, fence_len))
}

/// `![alt](target "title")`, target optionally wrapped in `<>`. A Liquid
/// `{{ ... }}` expression inside the target may contain spaces and quotes.
static MARKDOWN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(
        r#"!\[[^\]]*\]\(\s*<?((?:\{\{.*?\}\}|[^)\s>])+)>?(?:\s+["'][^"']*["'])?\s*\)"#,
    ) {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid markdown image regex: {err}"),
    }
});

/// `<img ... src="target" ...>`, closed by the quote that opened it.
static HTML_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)')"#) {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid html image regex: {err}"),
    }
});

/// `{% post_url NAME %}` and `{% link PATH %}`, with optional `-` whitespace control.
static LIQUID_LINK: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"\{%-?\s*(post_url|link)\s+([^\s%]+)\s*-?%\}") {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid liquid link regex: {err}"),
    }
});

/// Byte ranges of inline code spans on a line (between matching backtick runs).
fn inline_code_spans(line: &str) -> Vec<Range<usize>> {
    let bytes = line.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i] == b'`' {
            i += 1;
        }
        let run = i - start;
        let mut j = i;
        let mut closed = false;
        while j < bytes.len() {
            if bytes[j] == b'`' {
                let close_start = j;
                while j < bytes.len() && bytes[j] == b'`' {
                    j += 1;
                }
                if j - close_start == run {
                    spans.push(start..j);
                    closed = true;
                    break;
                }
            } else {
                j += 1;
            }
        }
        if closed {
            i = j;
        }
    }
    spans
}

/// Scan a Markdown body for references.
///
/// `first_line` is the file line number of the body's first line, so that
/// positions point into the original file.
#[must_use]
pub fn scan_references(body: &str, first_line: usize) -> Vec<Reference> {
    let mut references = Vec::new();
    let mut state = MarkdownState::Prose;

    for (index, line) in body.lines().enumerate() {
        let line_number = first_line + index;

        // ``` and ~~~ fences per CommonMark
        let trimmed_line = line.trim_start();
        if let Some((fence_char, fence_len)) = parse_fence(trimmed_line) {
            match &state {
                MarkdownState::Prose => {
                    state = MarkdownState::FencedBlock {
                        fence_char,
                        opening_fence_len: fence_len,
                    };
                    continue;
                }
                MarkdownState::FencedBlock {
                    fence_char: open_fence_char,
                    opening_fence_len,
                } => {
                    // a closing fence carries no info string
                    if fence_char == *open_fence_char
                        && fence_len >= *opening_fence_len
                        && trimmed_line[fence_len..].trim().is_empty()
                    {
                        state = MarkdownState::Prose;
                        continue;
                    }
                }
            }
        }

        if let MarkdownState::FencedBlock { .. } = state {
            continue;
        }

        let code_spans = inline_code_spans(line);
        let in_code = |pos: usize| code_spans.iter().any(|span| span.contains(&pos));

        let mut push = |kind: ReferenceKind, start: usize, raw: &str| {
            if !in_code(start) {
                references.push(Reference {
                    kind,
                    raw: raw.to_owned(),
                    line: line_number,
                    column: start + 1,
                });
            }
        };

        for caps in MARKDOWN_IMAGE.captures_iter(line) {
            if let (Some(whole), Some(target)) = (caps.get(0), caps.get(1)) {
                push(ReferenceKind::Image, whole.start(), target.as_str());
            }
        }
        for caps in HTML_IMAGE.captures_iter(line) {
            if let (Some(whole), Some(target)) = (caps.get(0), caps.get(1).or_else(|| caps.get(2)))
            {
                push(ReferenceKind::Image, whole.start(), target.as_str());
            }
        }
        for caps in LIQUID_LINK.captures_iter(line) {
            if let (Some(whole), Some(tag), Some(target)) = (caps.get(0), caps.get(1), caps.get(2))
            {
                let kind = if tag.as_str() == "post_url" {
                    ReferenceKind::PostUrl
                } else {
                    ReferenceKind::Link
                };
                push(kind, whole.start(), target.as_str());
            }
        }
    }

    references.sort_by_key(|r| (r.line, r.column));
    references
}
