//! Filename and slug grammar for Jekyll blog content.
//!
//! This crate is the single source of truth for the naming conventions the
//! blog linter enforces: post filenames (`YYYY-MM-DD-slug.md`), developer
//! profile filenames (`slug.md`), and slug-shaped values such as tags.

use chrono::NaiveDate;
use thiserror::Error;

/// The only extension accepted for posts and profiles.
pub const CONTENT_EXTENSION: &str = "md";

/// Maximum allowed length for a slug, in bytes.
pub const SLUG_MAX_LENGTH: usize = 200;

/// Length of the `YYYY-MM-DD` prefix of a post filename.
pub const DATE_PREFIX_LEN: usize = 10;

/// Errors from filename and slug validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    /// A specific dash-separated word of a slug is invalid.
    #[error("Word #{num}: {cause}")]
    Word {
        /// 1-based word number.
        num: usize,
        /// Byte offset of this word within the validated string.
        offset: usize,
        /// The raw word that failed validation.
        word: String,
        /// Human-readable description of the problem.
        cause: String,
    },

    /// The name as a whole is invalid (extension, date, case, length, etc.).
    #[error("Invalid name '{name}': {cause}")]
    Name {
        /// The raw name that failed validation.
        name: String,
        /// Human-readable description of the problem.
        cause: String,
    },
}

impl NameError {
    fn name(name: &str, cause: impl Into<String>) -> Self {
        Self::Name {
            name: name.to_owned(),
            cause: cause.into(),
        }
    }

    /// Shift the byte offset of a word error, used when a slug is embedded
    /// in a longer string such as a post filename.
    #[must_use]
    fn shifted(self, by: usize) -> Self {
        match self {
            Self::Word {
                num,
                offset,
                word,
                cause,
            } => Self::Word {
                num,
                offset: offset + by,
                word,
                cause,
            },
            other @ Self::Name { .. } => other,
        }
    }
}

/// A validated slug: lowercase words joined by single dashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slug {
    /// The raw slug string.
    pub raw: String,
    /// The dash-separated words, in order.
    pub words: Vec<String>,
}

impl Slug {
    /// Number of words in the slug.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

/// A parsed post filename such as `2021-03-14-pi-day.md`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostName {
    /// The full filename, extension included.
    pub file_name: String,
    /// The publication date encoded in the filename.
    pub date: NaiveDate,
    /// The slug following the date.
    pub slug: Slug,
}

impl PostName {
    /// The `YYYY-MM-DD` date prefix.
    #[must_use]
    pub fn date_prefix(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// A parsed developer profile filename such as `ada-lovelace.md`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileName {
    /// The full filename, extension included.
    pub file_name: String,
    /// The slug, which is also the author id posts refer to.
    pub slug: Slug,
}

/// Validates a slug word without regex.
///
/// Valid words are non-empty and contain only `[a-z0-9]`.
#[inline]
#[must_use]
pub fn is_valid_slug_word(word: &str) -> bool {
    !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// Parse exactly `width` ASCII digits into a number.
///
/// Unlike `str::parse`, this rejects signs and requires zero padding,
/// so `"03"` is accepted for width 2 and `"3"` is not.
#[inline]
#[must_use]
pub fn parse_fixed_digits(value: &str, width: usize) -> Option<u32> {
    if value.len() != width || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Validate a slug: lowercase ASCII words separated by single dashes.
///
/// # Errors
/// Returns [`NameError::Name`] for whole-slug problems (empty, too long,
/// uppercase, whitespace) and [`NameError::Word`] for the first invalid word.
pub fn validate_slug(slug: &str) -> Result<Slug, NameError> {
    if slug.is_empty() {
        return Err(NameError::name(slug, "slug is empty"));
    }

    if slug.len() > SLUG_MAX_LENGTH {
        return Err(NameError::name(
            slug,
            format!("too long ({} chars, max {SLUG_MAX_LENGTH})", slug.len()),
        ));
    }

    if slug.chars().any(char::is_whitespace) {
        return Err(NameError::name(slug, "must not contain whitespace"));
    }

    if slug != slug.to_lowercase() {
        return Err(NameError::name(slug, "must be lowercase"));
    }

    let mut words = Vec::new();
    let mut offset = 0;
    for (i, word) in slug.split('-').enumerate() {
        if word.is_empty() {
            let cause = if i == 0 {
                "slug must not start with '-'"
            } else if offset == slug.len() {
                "slug must not end with '-'"
            } else {
                "empty word (consecutive '-')"
            };
            return Err(NameError::Word {
                num: i + 1,
                offset,
                word: String::new(),
                cause: cause.to_owned(),
            });
        }
        if !is_valid_slug_word(word) {
            return Err(NameError::Word {
                num: i + 1,
                offset,
                word: word.to_owned(),
                cause: format!("Invalid word '{word}'. Must contain only [a-z0-9]"),
            });
        }
        words.push(word.to_owned());
        offset += word.len() + 1;
    }

    Ok(Slug {
        raw: slug.to_owned(),
        words,
    })
}

/// Split `name` into `(stem, extension)` and require the content extension.
fn split_content_extension(name: &str) -> Result<&str, NameError> {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return Err(NameError::name(
            name,
            format!("missing '.{CONTENT_EXTENSION}' extension"),
        ));
    };
    if ext != CONTENT_EXTENSION {
        return Err(NameError::name(
            name,
            format!("extension must be '.{CONTENT_EXTENSION}', got '.{ext}'"),
        ));
    }
    Ok(stem)
}

/// Parse the `YYYY-MM-DD` prefix of a post name.
fn parse_date_prefix(name: &str, prefix: &str) -> Result<NaiveDate, NameError> {
    let bytes = prefix.as_bytes();
    if bytes.len() != DATE_PREFIX_LEN || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(NameError::name(name, "must start with a YYYY-MM-DD date"));
    }

    let fields = (
        parse_fixed_digits(&prefix[0..4], 4),
        parse_fixed_digits(&prefix[5..7], 2),
        parse_fixed_digits(&prefix[8..10], 2),
    );
    let (Some(year), Some(month), Some(day)) = fields else {
        return Err(NameError::name(name, "must start with a YYYY-MM-DD date"));
    };

    let year = i32::try_from(year)
        .map_err(|_| NameError::name(name, format!("year {year} is out of range")))?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| NameError::name(name, format!("'{prefix}' is not a calendar date")))
}

/// Parse and validate a post filename of the form `YYYY-MM-DD-slug.md`.
///
/// # Errors
/// Returns [`NameError`] when the extension, date, or slug is invalid.
/// Word offsets are relative to the start of the filename.
pub fn parse_post_name(file_name: &str) -> Result<PostName, NameError> {
    let stem = split_content_extension(file_name)?;

    let (Some(prefix), Some(separator)) = (
        stem.get(..DATE_PREFIX_LEN),
        stem.get(DATE_PREFIX_LEN..=DATE_PREFIX_LEN),
    ) else {
        return Err(NameError::name(
            file_name,
            "must look like YYYY-MM-DD-slug.md",
        ));
    };
    let date = parse_date_prefix(file_name, prefix)?;

    if separator != "-" {
        return Err(NameError::name(
            file_name,
            "date must be followed by '-' and a slug",
        ));
    }

    let slug_start = DATE_PREFIX_LEN + 1;
    let slug = validate_slug(&stem[slug_start..]).map_err(|e| match e {
        NameError::Name { cause, .. } => NameError::name(file_name, format!("slug {cause}")),
        word @ NameError::Word { .. } => word.shifted(slug_start),
    })?;

    Ok(PostName {
        file_name: file_name.to_owned(),
        date,
        slug,
    })
}

/// Parse and validate a profile filename of the form `slug.md`.
///
/// # Errors
/// Returns [`NameError`] when the extension or slug is invalid.
pub fn parse_profile_name(file_name: &str) -> Result<ProfileName, NameError> {
    let stem = split_content_extension(file_name)?;
    let slug = validate_slug(stem).map_err(|e| match e {
        NameError::Name { cause, .. } => NameError::name(file_name, cause),
        word @ NameError::Word { .. } => word,
    })?;
    Ok(ProfileName {
        file_name: file_name.to_owned(),
        slug,
    })
}
