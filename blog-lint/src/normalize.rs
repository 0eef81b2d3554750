//! Normalisation of reference targets into site-relative paths.
//!
//! Content refers to site files in several spellings:
//! `/assets/img/a.png`, `{{ site.baseurl }}/assets/img/a.png`,
//! `{{ "/assets/img/a.png" | relative_url }}`, `assets/img/a.png?v=2`.
//! All of them normalise to the same site-relative path `assets/img/a.png`.

use std::sync::LazyLock;

use regex::Regex;

/// The outcome of normalising a reference target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Points outside the site (`https://`, `//cdn`, `data:`, `mailto:`).
    Remote,
    /// A site-relative path with `/` separators and no `.`/`..` components.
    Local(String),
    /// Nothing left after normalisation (`""`, `"#"`, `"{{ site.baseurl }}"`).
    Empty,
    /// Climbs above the site root with `..`.
    OutsideSite,
}

const REMOTE_PREFIXES: &[&str] = &["http://", "https://", "//", "data:", "mailto:"];

/// `{{ site.baseurl }}` / `{{ site.url }}` prefixes, any spacing, repeated.
static SITE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"^(?:\{\{-?\s*site\.(?:baseurl|url)\s*-?\}\})+") {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid site prefix regex: {err}"),
    }
});

/// `{{ "path" | relative_url }}` / `absolute_url`.
static URL_FILTER: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r#"^\{\{-?\s*["']([^"']*)["']\s*\|\s*(?:relative_url|absolute_url)\s*-?\}\}$"#)
    {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid url filter regex: {err}"),
    }
});

/// Lexically normalise a `/`-separated path, resolving `.` and `..`.
/// Returns `None` when `..` climbs above the start.
fn normalize_components(path: &str) -> Option<Vec<&str>> {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts)
}

/// Normalise a reference target as written in content.
#[must_use]
pub fn normalize_target(raw: &str) -> Target {
    let mut target = raw.trim();

    if let Some(caps) = URL_FILTER.captures(target)
        && let Some(inner) = caps.get(1)
    {
        target = inner.as_str().trim();
    }

    if let Some(prefix) = SITE_PREFIX.find(target) {
        target = &target[prefix.end()..];
    }

    let lower = target.to_ascii_lowercase();
    if REMOTE_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return Target::Remote;
    }

    let end = target.find(['?', '#']).unwrap_or(target.len());
    let target = &target[..end];

    match normalize_components(target) {
        None => Target::OutsideSite,
        Some(parts) if parts.is_empty() => Target::Empty,
        Some(parts) => Target::Local(parts.join("/")),
    }
}

/// Whether a site-relative path lies under a site-relative directory.
#[must_use]
pub fn is_under(path: &str, dir: &str) -> bool {
    let dir = dir.trim_matches('/');
    dir.is_empty()
        || path
            .strip_prefix(dir)
            .is_some_and(|rest| rest.starts_with('/'))
}
