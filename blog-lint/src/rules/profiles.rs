//! Rules over developer profiles.

use blog_names::parse_profile_name;

use super::{Check, missing_fields};
use crate::error::Finding;
use crate::format::front_matter::scalar_text;
use crate::images::{is_raster, probe_dimensions};
use crate::normalize::{Target, is_under, normalize_target};

pub(super) fn filename(check: &Check<'_>) -> Vec<Finding> {
    let strays = check.site.profile_strays.iter().map(|stray| {
        let name = stray.rsplit('/').next().unwrap_or(stray);
        check
            .finding(stray, "Profiles must use the '.md' extension")
            .value(name)
    });
    let misnamed = check.site.profiles.iter().filter_map(|profile| {
        parse_profile_name(&profile.file_name).err().map(|e| {
            check
                .finding(&profile.rel_path, e.to_string())
                .value(profile.file_name.as_str())
        })
    });
    strays.chain(misnamed).collect()
}

pub(super) fn required_fields(check: &Check<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    for profile in &check.site.profiles {
        match &profile.front_matter {
            Ok(_) => findings.extend(missing_fields(
                check,
                profile,
                &check.config.required_profile_fields,
            )),
            Err(e) => findings.push(check.finding(&profile.rel_path, e.to_string())),
        }
    }
    findings
}

pub(super) fn picture(check: &Check<'_>) -> Vec<Finding> {
    let field = check.config.picture_field.as_str();
    let dir = check.site.layout.profile_images_dir.trim_matches('/');
    let mut findings = Vec::new();

    for profile in &check.site.profiles {
        let Some(value) = profile.field(field) else {
            continue;
        };
        let raw = scalar_text(value).unwrap_or_else(|| value.to_string());
        let finding = |message: String| {
            check
                .finding(&profile.rel_path, message)
                .field(field)
                .value(raw.as_str())
        };

        let target = value.as_str().map_or(Target::Empty, normalize_target);
        let path = match target {
            Target::Remote => continue,
            Target::Local(path) => path,
            Target::Empty => {
                findings.push(finding("Picture must be an image path".to_owned()));
                continue;
            }
            Target::OutsideSite => {
                findings.push(finding("Picture points outside the site".to_owned()));
                continue;
            }
        };

        if !is_under(&path, dir) {
            findings.push(finding(format!("Pictures must live under {dir}/")));
        }
        if !check.site.file_exists(&path) {
            findings.push(finding("Picture not found".to_owned()));
            continue;
        }
        if !is_raster(&path) {
            continue;
        }
        match probe_dimensions(&check.site.resolve(&path)) {
            Ok((w, h)) if w == h => {}
            Ok((w, h)) => findings.push(finding(format!("Picture is {w}x{h}, must be square"))),
            Err(e) => findings.push(finding(e)),
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::super::testing::{png, run, site, write};

    #[test]
    fn test_filename() {
        let (_tmp, site) = site(|root| {
            write(root, "_developers/ada-lovelace.md", "---\n---\n");
            write(root, "_developers/Grace_Hopper.md", "---\n---\n");
            write(root, "_developers/alan-turing.html", "x");
        });
        let findings = run("profile-filename", &site);
        let values: Vec<&str> = findings.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["alan-turing.html", "Grace_Hopper.md"]);
    }

    #[test]
    fn test_required_fields() {
        let (_tmp, site) = site(|root| {
            write(root, "_developers/ada-lovelace.md", "---\nname: Ada\n---\n");
            write(root, "_developers/alan-turing.md", "no front matter\n");
            write(
                root,
                "_developers/grace-hopper.md",
                "---\nname: Grace\npicture: /assets/img/developers/g.png\n---\n",
            );
        });
        let findings = run("profile-required-fields", &site);
        assert_eq!(findings.len(), 2, "{findings:?}");
        assert_eq!(findings[0].file.to_string_lossy(), "_developers/ada-lovelace.md");
        assert_eq!(findings[0].field, "picture");
        assert!(findings[1].message.contains("missing front matter"));
    }

    #[test]
    fn test_picture() {
        let (_tmp, site) = site(|root| {
            write(
                root,
                "_developers/ada-lovelace.md",
                "---\npicture: /assets/img/developers/ada.png\n---\n",
            );
            png(root, "assets/img/developers/ada.png", 200, 200);
            write(
                root,
                "_developers/alan-turing.md",
                "---\npicture: /assets/img/developers/alan.png\n---\n",
            );
            png(root, "assets/img/developers/alan.png", 200, 100);
            write(
                root,
                "_developers/grace-hopper.md",
                "---\npicture: /assets/img/posts/grace.png\n---\n",
            );
            write(
                root,
                "_developers/linus-torvalds.md",
                "---\npicture: https://example.com/linus.png\n---\n",
            );
        });
        let findings = run("profile-picture", &site);
        let messages: Vec<&str> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Picture is 200x100, must be square",
                "Pictures must live under assets/img/developers/",
                "Picture not found",
            ]
        );
    }
}
