//! Site snapshot: every file the rules look at, loaded once.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde_json::Value;

use crate::config::SiteLayout;
use crate::error::{ScanError, ScanErrorKind};
use crate::format::front_matter::{FrontMatter, FrontMatterError, split_front_matter};
use crate::format::markdown::{Reference, scan_references};
use crate::normalize::{Target, normalize_target};
use crate::strategy::fs::{compile_excludes, find_files, read_file_bounded, rel_path};

/// A Markdown content file with its front matter and body references.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Document {
    /// Path as discovered on disk.
    pub path: PathBuf,
    /// Site-relative path with `/` separators.
    pub rel_path: String,
    /// Bare filename.
    pub file_name: String,
    /// Parsed front matter, or why it is unusable.
    pub front_matter: Result<FrontMatter, FrontMatterError>,
    /// References found in the body, with file line numbers.
    pub references: Vec<Reference>,
}

impl Document {
    /// Build a document from its text.
    #[must_use]
    pub fn parse(path: PathBuf, rel_path: String, content: &str) -> Self {
        let split = split_front_matter(content);
        let references = scan_references(split.body, split.body_line_offset + 1);
        let file_name = rel_path.rsplit('/').next().unwrap_or(&rel_path).to_owned();
        Self {
            path,
            rel_path,
            file_name,
            front_matter: split.front_matter,
            references,
        }
    }

    /// A front-matter field, when the front matter parsed.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.front_matter.as_ref().ok()?.get(name)
    }

    /// The filename without the `.md` extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        self.file_name
            .strip_suffix(".md")
            .unwrap_or(&self.file_name)
    }
}

/// Everything the rules inspect, read from disk once.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Site {
    /// Site root as given by the caller.
    pub root: PathBuf,
    /// Layout the snapshot was loaded with.
    pub layout: SiteLayout,
    /// Markdown files in the posts directory.
    pub posts: Vec<Document>,
    /// Site-relative paths of non-Markdown files in the posts directory.
    pub post_strays: Vec<String>,
    /// Markdown files in the profiles directory.
    pub profiles: Vec<Document>,
    /// Site-relative paths of non-Markdown files in the profiles directory.
    pub profile_strays: Vec<String>,
    /// Site-relative paths of every file under the images directory.
    pub images: Vec<String>,
    /// Number of files read or listed successfully.
    pub scanned_files: usize,
    /// Files that could not be read.
    pub scan_errors: Vec<ScanError>,
    /// Root with symlinks resolved; referenced files must stay below it.
    canonical_root: PathBuf,
}

/// Reads content files while enforcing the run-wide limits.
struct Loader<'a> {
    root: &'a Path,
    layout: &'a SiteLayout,
    excludes: Vec<Pattern>,
    files_read: usize,
    bytes_read: u64,
    exhausted: bool,
    scan_errors: Vec<ScanError>,
}

impl Loader<'_> {
    fn limit_exceeded(&mut self, path: &Path, limit: &str, value: String) {
        self.scan_errors.push(ScanError::new(
            path,
            ScanErrorKind::LimitExceeded,
            format!("Scan aborted: {limit} limit ({value}) reached; remaining files not scanned"),
        ));
        self.exhausted = true;
    }

    fn read(&mut self, path: &Path) -> Option<String> {
        if self.exhausted {
            return None;
        }
        if self.files_read >= self.layout.max_files {
            self.limit_exceeded(path, "max_files", self.layout.max_files.to_string());
            return None;
        }
        self.files_read += 1;

        let content = match read_file_bounded(path, self.layout.max_file_size) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e.message, "cannot read file");
                self.scan_errors.push(e);
                return None;
            }
        };

        let file_bytes = content.len() as u64;
        if self.bytes_read.saturating_add(file_bytes) > self.layout.max_total_bytes {
            self.limit_exceeded(
                path,
                "max_total_bytes",
                self.layout.max_total_bytes.to_string(),
            );
            return None;
        }
        self.bytes_read = self.bytes_read.saturating_add(file_bytes);
        Some(content)
    }

    /// Load Markdown documents from a directory; other files are strays.
    fn documents(&mut self, dir: &str) -> (Vec<Document>, Vec<String>) {
        let (files, errors) = find_files(self.root, dir, self.layout, &self.excludes);
        self.scan_errors.extend(errors);

        let mut documents = Vec::new();
        let mut strays = Vec::new();
        for path in files {
            let rel = rel_path(self.root, &path);
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                strays.push(rel);
                continue;
            }
            if let Some(content) = self.read(&path) {
                tracing::debug!(file = %rel, "loaded document");
                documents.push(Document::parse(path, rel, &content));
            }
        }
        (documents, strays)
    }

    fn list(&mut self, dir: &str) -> Vec<String> {
        let (files, errors) = find_files(self.root, dir, self.layout, &self.excludes);
        self.scan_errors.extend(errors);
        files.iter().map(|f| rel_path(self.root, f)).collect()
    }
}

impl Site {
    /// Load a snapshot of the site at `root`.
    ///
    /// Never fails: unreadable files are recorded in `scan_errors`, and a
    /// missing content directory is simply empty.
    #[must_use]
    pub fn load(root: &Path, layout: &SiteLayout) -> Self {
        let (excludes, exclude_errors) = compile_excludes(&layout.exclude);
        let mut loader = Loader {
            root,
            layout,
            excludes,
            files_read: 0,
            bytes_read: 0,
            exhausted: false,
            scan_errors: exclude_errors,
        };

        let (posts, post_strays) = loader.documents(&layout.posts_dir);
        let (profiles, profile_strays) = loader.documents(&layout.profiles_dir);
        let images = loader.list(&layout.images_dir);

        let scanned_files = posts.len()
            + post_strays.len()
            + profiles.len()
            + profile_strays.len()
            + images.len();

        tracing::info!(
            posts = posts.len(),
            profiles = profiles.len(),
            images = images.len(),
            scan_errors = loader.scan_errors.len(),
            "site loaded"
        );

        let canonical_root = root
            .canonicalize()
            .unwrap_or_else(|_| root.to_path_buf());

        Self {
            root: root.to_path_buf(),
            canonical_root,
            layout: layout.clone(),
            posts,
            post_strays,
            profiles,
            profile_strays,
            images,
            scanned_files,
            scan_errors: loader.scan_errors,
        }
    }

    /// Absolute (or root-relative) path of a site-relative path.
    #[must_use]
    pub fn resolve(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Whether a site-relative path names an existing regular file inside
    /// the site. A symlink resolving outside the root does not count.
    #[must_use]
    pub fn file_exists(&self, rel: &str) -> bool {
        let path = self.resolve(rel);
        if !path.is_file() {
            return false;
        }
        match path.canonicalize() {
            Ok(canonical) => canonical.starts_with(&self.canonical_root),
            Err(e) => {
                tracing::debug!(file = %rel, error = %e, "cannot resolve referenced file");
                false
            }
        }
    }

    /// Site-relative image paths referenced by posts, from bodies, teasers,
    /// and `{% link %}` tags.
    #[must_use]
    pub fn referenced_by_posts(&self, teaser_field: &str) -> BTreeSet<String> {
        let mut referenced = BTreeSet::new();
        for post in &self.posts {
            let teaser = post
                .field(teaser_field)
                .and_then(Value::as_str)
                .map(normalize_target);
            let body = post.references.iter().map(|r| normalize_target(&r.raw));
            for target in body.chain(teaser) {
                if let Target::Local(path) = target {
                    referenced.insert(path);
                }
            }
        }
        referenced
    }
}
