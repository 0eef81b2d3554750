//! The rule catalog.
//!
//! Every rule is a plain function over the [`Site`] snapshot. Rules do not
//! share state and can run in any order; the catalog order is only the
//! report order.

mod assets;
mod posts;
mod profiles;

use crate::config::RuleConfig;
use crate::error::Finding;
use crate::format::front_matter::is_present;
use crate::report::RuleResult;
use crate::site::{Document, Site};

/// What a rule function receives.
#[derive(Debug, Clone, Copy)]
pub struct Check<'a> {
    /// Id of the running rule, stamped on every finding.
    pub id: &'static str,
    /// The snapshot under inspection.
    pub site: &'a Site,
    /// Rule parameters.
    pub config: &'a RuleConfig,
}

impl Check<'_> {
    /// Start a finding about a site-relative file.
    #[must_use]
    pub fn finding(&self, file: &str, message: impl Into<String>) -> Finding {
        Finding::new(self.id, file, message)
    }
}

type CheckFn = fn(&Check<'_>) -> Vec<Finding>;

/// A registered rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleDef {
    /// Stable kebab-case id, used for selection and in reports.
    pub id: &'static str,
    /// The convention being checked.
    pub description: &'static str,
    /// How to fix a violation.
    pub hint: &'static str,
    check: CheckFn,
}

impl RuleDef {
    /// Run the rule against a snapshot.
    #[must_use]
    pub fn run(&self, site: &Site, config: &RuleConfig) -> RuleResult {
        let findings = (self.check)(&Check {
            id: self.id,
            site,
            config,
        });
        tracing::debug!(rule = self.id, findings = findings.len(), "rule finished");
        RuleResult {
            id: self.id.to_owned(),
            description: self.description.to_owned(),
            hint: self.hint.to_owned(),
            passed: findings.is_empty(),
            findings,
        }
    }
}

static CATALOG: &[RuleDef] = &[
    RuleDef {
        id: "post-extension",
        description: "Files in the posts directory use the .md extension",
        hint: "Rename the file to .md, or move non-post files out of the posts directory",
        check: posts::extension,
    },
    RuleDef {
        id: "post-filename",
        description: "Post filenames look like YYYY-MM-DD-slug.md with a real date",
        hint: "Use a zero-padded calendar date and a lowercase dash-separated slug",
        check: posts::filename,
    },
    RuleDef {
        id: "post-slug-length",
        description: "Post slugs stay within the configured word count",
        hint: "Shorten the slug; the title can stay long",
        check: posts::slug_length,
    },
    RuleDef {
        id: "post-unique-slug",
        description: "No two posts share a slug",
        hint: "Pick a distinct slug so post URLs do not collide",
        check: posts::unique_slug,
    },
    RuleDef {
        id: "post-front-matter",
        description: "Posts start with a parseable YAML front-matter mapping",
        hint: "Start the file with '---', a YAML mapping, and a closing '---'",
        check: posts::front_matter,
    },
    RuleDef {
        id: "post-required-fields",
        description: "Posts carry every required front-matter field",
        hint: "Add the missing fields to the front matter",
        check: posts::required_fields,
    },
    RuleDef {
        id: "post-layout",
        description: "Posts use the configured layout",
        hint: "Set 'layout' to the post layout",
        check: posts::layout,
    },
    RuleDef {
        id: "post-date",
        description: "A front-matter date agrees with the filename date",
        hint: "Make the 'date' field and the filename carry the same day",
        check: posts::date,
    },
    RuleDef {
        id: "post-authors",
        description: "Every post author has a developer profile",
        hint: "Create the profile file or fix the author id",
        check: posts::authors,
    },
    RuleDef {
        id: "post-tags",
        description: "Post tags are lowercase dash-separated words",
        hint: "Write tags like 'machine-learning'",
        check: posts::tags,
    },
    RuleDef {
        id: "post-teaser",
        description: "The teaser image exists",
        hint: "Add the teaser image or fix its path",
        check: posts::teaser,
    },
    RuleDef {
        id: "post-teaser-size",
        description: "The teaser image is large enough",
        hint: "Export the teaser at least at the configured minimum size",
        check: posts::teaser_size,
    },
    RuleDef {
        id: "post-images",
        description: "Images embedded in posts exist",
        hint: "Add the image or fix its path",
        check: posts::images,
    },
    RuleDef {
        id: "post-image-location",
        description: "Post images live under the post images directory",
        hint: "Move the image under the post images directory",
        check: posts::image_location,
    },
    RuleDef {
        id: "post-links",
        description: "post_url and link tags point at existing content",
        hint: "Use the target post's filename without extension in post_url",
        check: posts::links,
    },
    RuleDef {
        id: "image-filename",
        description: "Image filenames are lowercase, without spaces, with a web extension",
        hint: "Rename the image to lowercase with a png/jpg/jpeg/gif/svg/webp extension",
        check: assets::filename,
    },
    RuleDef {
        id: "image-unreferenced",
        description: "Every post image is used by a post",
        hint: "Delete the unused image or reference it",
        check: assets::unreferenced,
    },
    RuleDef {
        id: "profile-filename",
        description: "Profile filenames look like firstname-lastname.md",
        hint: "Rename the profile to a lowercase dash-separated slug with .md extension",
        check: profiles::filename,
    },
    RuleDef {
        id: "profile-required-fields",
        description: "Profiles carry every required front-matter field",
        hint: "Add the missing fields to the profile front matter",
        check: profiles::required_fields,
    },
    RuleDef {
        id: "profile-picture",
        description: "Profile pictures exist, live in the profile images directory, and are square",
        hint: "Add a square picture under the profile images directory",
        check: profiles::picture,
    },
];

/// Every registered rule, in report order.
#[must_use]
pub fn catalog() -> &'static [RuleDef] {
    CATALOG
}

/// Look up a rule by id.
#[must_use]
pub fn find_rule(id: &str) -> Option<&'static RuleDef> {
    CATALOG.iter().find(|rule| rule.id == id)
}

/// Resolve `only`/`skip` into the rules to run, in catalog order.
///
/// # Errors
///
/// Returns an error naming every unknown rule id.
pub fn select_rules(config: &RuleConfig) -> anyhow::Result<Vec<&'static RuleDef>> {
    let unknown: Vec<&str> = config
        .only
        .iter()
        .chain(&config.skip)
        .map(String::as_str)
        .filter(|id| find_rule(id).is_none())
        .collect();
    if !unknown.is_empty() {
        anyhow::bail!(
            "Unknown rule id(s): {} (see --list-rules)",
            unknown.join(", ")
        );
    }

    Ok(CATALOG
        .iter()
        .filter(|rule| config.only.is_empty() || config.only.iter().any(|id| id == rule.id))
        .filter(|rule| !config.skip.iter().any(|id| id == rule.id))
        .collect())
}

/// Run the selected rules against a snapshot.
///
/// # Errors
///
/// Returns an error if the selection names unknown rules.
pub fn run_rules(site: &Site, config: &RuleConfig) -> anyhow::Result<Vec<RuleResult>> {
    Ok(select_rules(config)?
        .into_iter()
        .map(|rule| rule.run(site, config))
        .collect())
}

/// Findings for every required field that is missing or empty.
fn missing_fields(check: &Check<'_>, doc: &Document, required: &[String]) -> Vec<Finding> {
    let Ok(front_matter) = &doc.front_matter else {
        return Vec::new();
    };
    required
        .iter()
        .filter_map(|name| match front_matter.get(name) {
            None => Some(
                check
                    .finding(&doc.rel_path, format!("Missing required field '{name}'"))
                    .field(name),
            ),
            Some(value) if !is_present(value) => Some(
                check
                    .finding(&doc.rel_path, format!("Required field '{name}' is empty"))
                    .field(name),
            ),
            Some(_) => None,
        })
        .collect()
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_catalog_ids_are_unique_and_kebab_case() {
        let ids: BTreeSet<&str> = catalog().iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), catalog().len());
        for rule in catalog() {
            assert!(
                blog_names::validate_slug(rule.id).is_ok(),
                "rule id {} is not kebab-case",
                rule.id
            );
        }
    }

    #[test]
    fn test_select_all_by_default() {
        let rules = select_rules(&RuleConfig::default()).unwrap();
        assert_eq!(rules.len(), catalog().len());
    }

    #[test]
    fn test_select_only_and_skip() {
        let mut config = RuleConfig::default();
        config.only = vec!["post-layout".to_owned(), "post-tags".to_owned()];
        config.skip = vec!["post-tags".to_owned()];
        let ids: Vec<&str> = select_rules(&config)
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["post-layout"]);
    }

    #[test]
    fn test_select_unknown_rule_errors() {
        let mut config = RuleConfig::default();
        config.skip = vec!["post-nope".to_owned()];
        let err = select_rules(&config).unwrap_err().to_string();
        assert!(err.contains("post-nope"), "got: {err}");
    }
}
