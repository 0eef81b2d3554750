//! Rules over the posts directory.

use std::collections::{BTreeMap, BTreeSet};

use blog_names::{PostName, parse_post_name, validate_slug};
use serde_json::Value;

use super::{Check, missing_fields};
use crate::error::Finding;
use crate::format::front_matter::{scalar_text, string_list};
use crate::format::markdown::ReferenceKind;
use crate::images::{is_raster, probe_dimensions};
use crate::normalize::{Target, is_under, normalize_target};
use crate::site::Document;

/// Posts whose filename parses, with the parsed name.
fn named_posts<'a>(check: &Check<'a>) -> impl Iterator<Item = (&'a Document, PostName)> {
    check
        .site
        .posts
        .iter()
        .filter_map(|post| parse_post_name(&post.file_name).ok().map(|name| (post, name)))
}

pub(super) fn extension(check: &Check<'_>) -> Vec<Finding> {
    check
        .site
        .post_strays
        .iter()
        .map(|stray| {
            let name = stray.rsplit('/').next().unwrap_or(stray);
            check
                .finding(stray, "Posts must use the '.md' extension")
                .value(name)
        })
        .collect()
}

pub(super) fn filename(check: &Check<'_>) -> Vec<Finding> {
    check
        .site
        .posts
        .iter()
        .filter_map(|post| {
            parse_post_name(&post.file_name).err().map(|e| {
                check
                    .finding(&post.rel_path, e.to_string())
                    .value(post.file_name.as_str())
            })
        })
        .collect()
}

pub(super) fn slug_length(check: &Check<'_>) -> Vec<Finding> {
    let max = check.config.max_slug_words;
    named_posts(check)
        .filter(|(_, name)| name.slug.word_count() > max)
        .map(|(post, name)| {
            check
                .finding(
                    &post.rel_path,
                    format!("Slug has {} words, max {max}", name.slug.word_count()),
                )
                .value(name.slug.raw)
        })
        .collect()
}

pub(super) fn unique_slug(check: &Check<'_>) -> Vec<Finding> {
    let mut by_slug: BTreeMap<String, Vec<&Document>> = BTreeMap::new();
    for (post, name) in named_posts(check) {
        by_slug.entry(name.slug.raw).or_default().push(post);
    }

    let mut findings = Vec::new();
    for (slug, posts) in by_slug {
        let Some((first, duplicates)) = posts.split_first() else {
            continue;
        };
        for post in duplicates {
            findings.push(
                check
                    .finding(
                        &post.rel_path,
                        format!("Slug is already used by {}", first.rel_path),
                    )
                    .value(slug.as_str()),
            );
        }
    }
    findings
}

pub(super) fn front_matter(check: &Check<'_>) -> Vec<Finding> {
    check
        .site
        .posts
        .iter()
        .filter_map(|post| {
            post.front_matter
                .as_ref()
                .err()
                .map(|e| check.finding(&post.rel_path, e.to_string()))
        })
        .collect()
}

pub(super) fn required_fields(check: &Check<'_>) -> Vec<Finding> {
    check
        .site
        .posts
        .iter()
        .flat_map(|post| missing_fields(check, post, &check.config.required_post_fields))
        .collect()
}

pub(super) fn layout(check: &Check<'_>) -> Vec<Finding> {
    let expected = check.config.post_layout.as_str();
    check
        .site
        .posts
        .iter()
        .filter_map(|post| {
            let value = post.field("layout")?;
            let actual = scalar_text(value).unwrap_or_else(|| value.to_string());
            (actual != expected).then(|| {
                check
                    .finding(&post.rel_path, format!("Layout must be '{expected}'"))
                    .field("layout")
                    .value(actual)
            })
        })
        .collect()
}

pub(super) fn date(check: &Check<'_>) -> Vec<Finding> {
    named_posts(check)
        .filter_map(|(post, name)| {
            let value = post.field("date")?;
            let prefix = name.date_prefix();
            let matches = scalar_text(value).is_some_and(|text| text.trim().starts_with(&prefix));
            (!matches).then(|| {
                check
                    .finding(
                        &post.rel_path,
                        format!("Date does not match the filename date {prefix}"),
                    )
                    .field("date")
                    .value(scalar_text(value).unwrap_or_else(|| value.to_string()))
            })
        })
        .collect()
}

pub(super) fn authors(check: &Check<'_>) -> Vec<Finding> {
    let field = check.config.authors_field.as_str();
    let profiles_dir = check.site.layout.profiles_dir.trim_matches('/');
    let mut findings = Vec::new();

    for post in &check.site.posts {
        let Some(value) = post.field(field) else {
            continue;
        };
        let authors = match string_list(value) {
            Ok(authors) => authors,
            Err(e) => {
                findings.push(
                    check
                        .finding(&post.rel_path, format!("Authors must be author ids: {e}"))
                        .field(field),
                );
                continue;
            }
        };

        for author in authors {
            if let Err(e) = validate_slug(&author) {
                findings.push(
                    check
                        .finding(&post.rel_path, format!("Author id is not a valid slug: {e}"))
                        .field(field)
                        .value(author),
                );
                continue;
            }
            let profile = format!("{profiles_dir}/{author}.md");
            if !check.site.file_exists(&profile) {
                findings.push(
                    check
                        .finding(&post.rel_path, format!("Author has no profile {profile}"))
                        .field(field)
                        .value(author),
                );
            }
        }
    }
    findings
}

pub(super) fn tags(check: &Check<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    for post in &check.site.posts {
        let Some(value) = post.field("tags") else {
            continue;
        };
        match string_list(value) {
            Ok(tags) => {
                for tag in tags {
                    if let Err(e) = validate_slug(&tag) {
                        findings.push(
                            check
                                .finding(&post.rel_path, format!("Tag is not a valid slug: {e}"))
                                .field("tags")
                                .value(tag),
                        );
                    }
                }
            }
            Err(e) => findings.push(
                check
                    .finding(&post.rel_path, format!("Tags must be strings: {e}"))
                    .field("tags"),
            ),
        }
    }
    findings
}

/// The teaser of a post, as written and normalised.
fn teaser_of<'a>(check: &Check<'_>, post: &'a Document) -> Option<(&'a Value, Target)> {
    let value = post.field(&check.config.teaser_field)?;
    let target = value.as_str().map_or(Target::Empty, normalize_target);
    Some((value, target))
}

pub(super) fn teaser(check: &Check<'_>) -> Vec<Finding> {
    let field = check.config.teaser_field.as_str();
    check
        .site
        .posts
        .iter()
        .filter_map(|post| {
            let (value, target) = teaser_of(check, post)?;
            let raw = scalar_text(value).unwrap_or_else(|| value.to_string());
            let message = match target {
                Target::Remote => return None,
                Target::Local(path) if check.site.file_exists(&path) => return None,
                Target::Local(_) => "Teaser image not found",
                Target::Empty => "Teaser must be an image path",
                Target::OutsideSite => "Teaser points outside the site",
            };
            Some(
                check
                    .finding(&post.rel_path, message)
                    .field(field)
                    .value(raw),
            )
        })
        .collect()
}

pub(super) fn teaser_size(check: &Check<'_>) -> Vec<Finding> {
    let field = check.config.teaser_field.as_str();
    let (min_w, min_h) = (check.config.teaser_min_width, check.config.teaser_min_height);
    check
        .site
        .posts
        .iter()
        .filter_map(|post| {
            let (_, target) = teaser_of(check, post)?;
            let Target::Local(path) = target else {
                return None;
            };
            if !is_raster(&path) || !check.site.file_exists(&path) {
                return None;
            }
            let message = match probe_dimensions(&check.site.resolve(&path)) {
                Ok((w, h)) if w >= min_w && h >= min_h => return None,
                Ok((w, h)) => format!("Teaser is {w}x{h}, minimum is {min_w}x{min_h}"),
                Err(e) => e,
            };
            Some(
                check
                    .finding(&post.rel_path, message)
                    .field(field)
                    .value(path),
            )
        })
        .collect()
}

pub(super) fn images(check: &Check<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    for post in &check.site.posts {
        for reference in post
            .references
            .iter()
            .filter(|r| r.kind == ReferenceKind::Image)
        {
            let message = match normalize_target(&reference.raw) {
                Target::Remote => continue,
                Target::Local(path) if check.site.file_exists(&path) => continue,
                Target::Local(_) => "Image not found",
                Target::Empty => "Image reference is empty",
                Target::OutsideSite => "Image points outside the site",
            };
            findings.push(
                check
                    .finding(&post.rel_path, message)
                    .at(reference.line, reference.column)
                    .value(reference.raw.as_str()),
            );
        }
    }
    findings
}

pub(super) fn image_location(check: &Check<'_>) -> Vec<Finding> {
    let dir = check.site.layout.post_images_dir.trim_matches('/');
    let message = format!("Post images must live under {dir}/");
    let mut findings = Vec::new();

    for post in &check.site.posts {
        if let Some((_, Target::Local(path))) = teaser_of(check, post)
            && !is_under(&path, dir)
        {
            findings.push(
                check
                    .finding(&post.rel_path, message.as_str())
                    .field(&check.config.teaser_field)
                    .value(path),
            );
        }

        for reference in post
            .references
            .iter()
            .filter(|r| r.kind == ReferenceKind::Image)
        {
            if let Target::Local(path) = normalize_target(&reference.raw)
                && !is_under(&path, dir)
            {
                findings.push(
                    check
                        .finding(&post.rel_path, message.as_str())
                        .at(reference.line, reference.column)
                        .value(reference.raw.as_str()),
                );
            }
        }
    }
    findings
}

pub(super) fn links(check: &Check<'_>) -> Vec<Finding> {
    let posts_dir = check.site.layout.posts_dir.trim_matches('/');
    // post_url accepts the bare stem or a path below the posts directory
    let known: BTreeSet<&str> = check
        .site
        .posts
        .iter()
        .flat_map(|post| {
            let below_dir = post
                .rel_path
                .strip_prefix(posts_dir)
                .and_then(|rest| rest.strip_prefix('/'))
                .and_then(|rest| rest.strip_suffix(".md"));
            std::iter::once(post.stem()).chain(below_dir)
        })
        .collect();

    let mut findings = Vec::new();
    for post in &check.site.posts {
        for reference in &post.references {
            let message = match reference.kind {
                ReferenceKind::Image => continue,
                ReferenceKind::PostUrl if reference.raw.contains("{{") => continue,
                ReferenceKind::PostUrl if known.contains(reference.raw.as_str()) => continue,
                ReferenceKind::PostUrl => "post_url names no existing post",
                ReferenceKind::Link => match normalize_target(&reference.raw) {
                    Target::Remote => continue,
                    Target::Local(path) if check.site.file_exists(&path) => continue,
                    Target::Local(_) | Target::Empty => "link names no existing file",
                    Target::OutsideSite => "link points outside the site",
                },
            };
            findings.push(
                check
                    .finding(&post.rel_path, message)
                    .at(reference.line, reference.column)
                    .value(reference.raw.as_str()),
            );
        }
    }
    findings
}
