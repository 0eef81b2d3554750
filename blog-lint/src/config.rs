//! Configuration types for blog linting.
//!
//! Split into site layout (where content lives on disk, scan limits) and
//! rule parameters (what the rules enforce). Both deserialize from the
//! `.blog-lint.yaml` file at the site root; every key is optional.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Name of the config file looked up at the site root.
pub const CONFIG_FILE_NAME: &str = ".blog-lint.yaml";

/// Where content lives, relative to the site root, plus scan limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct SiteLayout {
    /// Directory holding posts (default: `_posts`).
    pub posts_dir: String,
    /// Directory holding developer profiles (default: `_developers`).
    pub profiles_dir: String,
    /// Root of all site images (default: `assets/img`).
    pub images_dir: String,
    /// Directory post images must live under (default: `assets/img/posts`).
    pub post_images_dir: String,
    /// Directory profile pictures must live under (default: `assets/img/developers`).
    pub profile_images_dir: String,
    /// Exclude patterns (glob format), matched against the site-relative
    /// path and against the bare filename.
    pub exclude: Vec<String>,
    /// Whether to follow symbolic links.
    ///
    /// **Defaults to `false`**: following symlinks allows escaping the site root.
    pub follow_links: bool,
    /// Maximum file size in bytes (default: 10 MB).
    pub max_file_size: u64,
    /// Maximum directory traversal depth (default: 64).
    pub max_depth: usize,
    /// Maximum total number of files to read (default: `100_000`).
    pub max_files: usize,
    /// Maximum total bytes to read across all files (default: 512 MB).
    pub max_total_bytes: u64,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            posts_dir: "_posts".to_owned(),
            profiles_dir: "_developers".to_owned(),
            images_dir: "assets/img".to_owned(),
            post_images_dir: "assets/img/posts".to_owned(),
            profile_images_dir: "assets/img/developers".to_owned(),
            exclude: Vec::new(),
            follow_links: false,
            max_file_size: 10_485_760,
            max_depth: 64,
            max_files: 100_000,
            max_total_bytes: 536_870_912,
        }
    }
}

/// Parameters of the rule catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct RuleConfig {
    /// Required value of a post's `layout` field (default: `post`).
    pub post_layout: String,
    /// Front-matter fields every post must carry.
    pub required_post_fields: Vec<String>,
    /// Front-matter fields every developer profile must carry.
    pub required_profile_fields: Vec<String>,
    /// Post field listing author ids (default: `authors`).
    pub authors_field: String,
    /// Post field naming the teaser image (default: `teaser`).
    pub teaser_field: String,
    /// Profile field naming the profile picture (default: `picture`).
    pub picture_field: String,
    /// Maximum number of words in a post slug (default: 10).
    pub max_slug_words: usize,
    /// Minimum teaser width in pixels (default: 600).
    pub teaser_min_width: u32,
    /// Minimum teaser height in pixels (default: 300).
    pub teaser_min_height: u32,
    /// Run only these rule ids. Empty means all rules.
    pub only: Vec<String>,
    /// Never run these rule ids.
    pub skip: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            post_layout: "post".to_owned(),
            required_post_fields: Vec::from(
                ["layout", "title", "authors", "tags", "teaser"].map(str::to_owned),
            ),
            required_profile_fields: Vec::from(["name", "picture"].map(str::to_owned)),
            authors_field: "authors".to_owned(),
            teaser_field: "teaser".to_owned(),
            picture_field: "picture".to_owned(),
            max_slug_words: 10,
            teaser_min_width: 600,
            teaser_min_height: 300,
            only: Vec::new(),
            skip: Vec::new(),
        }
    }
}

/// Full linter configuration as stored in `.blog-lint.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct LintConfig {
    /// Filesystem layout and scan limits.
    pub layout: SiteLayout,
    /// Rule parameters and selection.
    pub rules: RuleConfig,
}

impl LintConfig {
    /// Load a config file. An empty file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// contains unknown keys.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse a config from YAML text. Blank text yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML or contains unknown keys.
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_saphyr::from_str(content)?)
    }

    /// Load `<root>/.blog-lint.yaml` if it exists, otherwise return the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    pub fn discover(root: &Path) -> anyhow::Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!(config = %path.display(), "loading config file");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
