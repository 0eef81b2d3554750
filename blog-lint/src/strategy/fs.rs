//! Filesystem content source.
//!
//! Lists files under a site directory and reads them safely.
//! Security properties enforced here:
//! - Symlinks are not followed by default (`follow_links: false`)
//! - Resolved paths are checked to remain within the site root
//! - Device files, pipes, and sockets are skipped
//! - Maximum directory depth is enforced to prevent infinite recursion
//! - Bounded streaming reads prevent TOCTOU and memory `DoS`

use std::io::Read;
use std::path::{Component, Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::config::SiteLayout;
use crate::error::{ScanError, ScanErrorKind};

/// Directories never descended into: Jekyll build output, caches, VCS.
pub const SKIP_DIRS: &[&str] = &[
    "_site",
    ".jekyll-cache",
    ".sass-cache",
    ".git",
    "node_modules",
    "vendor",
];

/// Compile exclude patterns once per run.
///
/// Invalid patterns are reported as scan errors and otherwise ignored.
pub fn compile_excludes(patterns: &[String]) -> (Vec<Pattern>, Vec<ScanError>) {
    let mut compiled = Vec::with_capacity(patterns.len());
    let mut scan_errors = Vec::new();
    for pat_str in patterns {
        match Pattern::new(pat_str) {
            Ok(pat) => compiled.push(pat),
            Err(e) => scan_errors.push(ScanError::new(
                pat_str,
                ScanErrorKind::InvalidExcludePattern,
                format!("Invalid exclude glob pattern '{pat_str}': {e}"),
            )),
        }
    }
    (compiled, scan_errors)
}

/// Check if a site-relative path matches any of the exclude patterns.
fn matches_exclude(rel_path: &str, exclude_patterns: &[Pattern]) -> bool {
    let file_name = rel_path.rsplit('/').next().unwrap_or(rel_path);
    exclude_patterns
        .iter()
        .any(|pattern| pattern.matches(rel_path) || pattern.matches(file_name))
}

/// Returns `true` if the entry should be **included** (not a skip dir, not hidden).
/// The walk root itself is always included.
fn is_walkable(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let Some(name) = entry.file_name().to_str() else {
        return true;
    };
    if entry.file_type().is_dir() {
        return !SKIP_DIRS.contains(&name) && !name.starts_with('.');
    }
    // Dotfiles (.DS_Store, .gitkeep) are not content.
    !name.starts_with('.')
}

/// Site-relative path with `/` separators.
#[must_use]
pub fn rel_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// List all regular files under `root/dir`, sorted.
///
/// A missing directory yields no files and no errors: a site without
/// profiles simply has nothing to check.
///
/// Returns `(files, scan_errors)`:
/// - `files`: paths that passed all filters.
/// - `scan_errors`: walk errors and boundary violations. These are never
///   silently discarded; CI must treat them as failures.
pub fn find_files(
    root: &Path,
    dir: &str,
    layout: &SiteLayout,
    exclude_patterns: &[Pattern],
) -> (Vec<PathBuf>, Vec<ScanError>) {
    let mut files = Vec::new();
    let mut scan_errors = Vec::new();

    let base = root.join(dir);
    if !base.is_dir() {
        tracing::debug!(dir = %base.display(), "directory not present, nothing to scan");
        return (files, scan_errors);
    }

    // Canonicalize the root once so we can enforce the boundary for every entry.
    let canonical_root = match root.canonicalize() {
        Ok(r) => r,
        Err(e) => {
            scan_errors.push(ScanError::new(
                root,
                ScanErrorKind::IoError,
                format!("Failed to canonicalize site root: {e}"),
            ));
            return (files, scan_errors);
        }
    };

    for entry_result in WalkDir::new(&base)
        .follow_links(layout.follow_links)
        .max_depth(layout.max_depth)
        .into_iter()
        .filter_entry(is_walkable)
    {
        let entry = match entry_result {
            Ok(e) => e,
            Err(walk_err) => {
                let path = walk_err
                    .path()
                    .map_or_else(|| base.clone(), Path::to_path_buf);
                scan_errors.push(ScanError::new(
                    path,
                    ScanErrorKind::WalkError,
                    format!("Directory traversal error: {walk_err}"),
                ));
                continue;
            }
        };

        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }

        // Catches symlink escapes even when follow_links is true.
        match file_path.canonicalize() {
            Ok(canonical_path) if !canonical_path.starts_with(&canonical_root) => {
                scan_errors.push(ScanError::new(
                    file_path,
                    ScanErrorKind::OutsideSite,
                    format!(
                        "Path resolves outside site root: {} -> {}",
                        file_path.display(),
                        canonical_path.display()
                    ),
                ));
                continue;
            }
            Ok(_) => {}
            Err(e) => {
                scan_errors.push(ScanError::new(
                    file_path,
                    ScanErrorKind::IoError,
                    format!("Failed to canonicalize path: {e}"),
                ));
                continue;
            }
        }

        // Only regular files: skip devices, pipes, sockets
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if let Ok(ft) = entry.metadata().map(|m| m.file_type())
                && (ft.is_block_device() || ft.is_char_device() || ft.is_fifo() || ft.is_socket())
            {
                continue;
            }
        }

        if matches_exclude(&rel_path(root, file_path), exclude_patterns) {
            tracing::debug!(file = %file_path.display(), "excluded");
            continue;
        }

        files.push(file_path.to_path_buf());
    }

    files.sort();
    files.dedup();
    (files, scan_errors)
}

/// Read a file using a bounded streaming read, enforcing `max_file_size`.
///
/// Uses `Read::take` so the size check and the read are the same
/// operation. Never calls `read_to_string` on an unbounded handle.
///
/// # Errors
///
/// Returns a [`ScanError`] if the file exceeds `max_file_size`, an I/O
/// error occurs, or the content is not valid UTF-8.
pub fn read_file_bounded(path: &Path, max_file_size: u64) -> Result<String, ScanError> {
    let file = std::fs::File::open(path).map_err(|e| {
        ScanError::new(path, ScanErrorKind::IoError, format!("Failed to open file: {e}"))
    })?;

    // Read at most max_file_size + 1 bytes to detect oversized files
    let mut buffer = Vec::new();
    file.take(max_file_size + 1)
        .read_to_end(&mut buffer)
        .map_err(|e| {
            ScanError::new(path, ScanErrorKind::IoError, format!("Failed to read file: {e}"))
        })?;

    if buffer.len() as u64 > max_file_size {
        return Err(ScanError::new(
            path,
            ScanErrorKind::FileTooLarge,
            format!("File exceeds maximum size of {max_file_size} bytes"),
        ));
    }

    String::from_utf8(buffer).map_err(|_| {
        ScanError::new(
            path,
            ScanErrorKind::InvalidEncoding,
            "File is not valid UTF-8".to_owned(),
        )
    })
}
