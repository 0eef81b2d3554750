#![allow(clippy::unwrap_used)]
//! Integration tests for `blog_lint::lint_site`.

use std::fs;
use std::path::Path;

use blog_lint::output::{write_human, write_json};
use blog_lint::{LintConfig, LintReport, ScanErrorKind, lint_site, rules};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn png(root: &Path, rel: &str, width: u32, height: u32) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbImage::new(width, height).save(path).unwrap();
}

/// A small site that follows every convention.
fn clean_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        "_posts/2021-03-14-pi-day.md",
        "---\n\
         layout: post\n\
         title: Pi Day\n\
         authors: [ada-lovelace]\n\
         tags: [math, fun]\n\
         teaser: /assets/img/posts/pi-teaser.png\n\
         ---\n\
         \n\
         ![circle]({{ site.baseurl }}/assets/img/posts/circle.png)\n\
         \n\
         See also {% post_url 2021-06-28-tau-day %}.\n\
         \n\
         ```markdown\n\
         ![not real](/assets/img/nowhere.png)\n\
         ```\n",
    );
    write(
        root,
        "_posts/2021-06-28-tau-day.md",
        "---\n\
         layout: post\n\
         title: Tau Day\n\
         authors: ada-lovelace\n\
         tags: math\n\
         teaser: /assets/img/posts/tau-teaser.jpg\n\
         date: 2021-06-28 09:00:00 +0200\n\
         ---\n\
         Text.\n",
    );
    write(
        root,
        "_developers/ada-lovelace.md",
        "---\nname: Ada Lovelace\npicture: /assets/img/developers/ada-lovelace.png\n---\nBio.\n",
    );
    png(root, "assets/img/posts/pi-teaser.png", 1200, 600);
    png(root, "assets/img/posts/tau-teaser.jpg", 600, 300);
    png(root, "assets/img/posts/circle.png", 64, 64);
    png(root, "assets/img/developers/ada-lovelace.png", 256, 256);
    tmp
}

fn failed_ids(report: &LintReport) -> Vec<&str> {
    report.failed_rules().map(|r| r.id.as_str()).collect()
}

#[test]
fn test_lint_site_missing_root_errors() {
    let tmp = TempDir::new().unwrap();
    let result = lint_site(&tmp.path().join("nope"), &LintConfig::default());
    let msg = result.unwrap_err().to_string();
    assert!(msg.contains("does not exist"), "got: {msg}");
}

#[test]
fn test_lint_site_root_is_file_errors() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("_config.yml");
    fs::write(&file, "title: blog\n").unwrap();
    let msg = lint_site(&file, &LintConfig::default())
        .unwrap_err()
        .to_string();
    assert!(msg.contains("not a directory"), "got: {msg}");
}

#[test]
fn test_lint_site_unknown_rule_errors() {
    let tmp = clean_site();
    let mut config = LintConfig::default();
    config.rules.only = vec!["post-colour".to_owned()];
    let msg = lint_site(tmp.path(), &config).unwrap_err().to_string();
    assert!(msg.contains("post-colour"), "got: {msg}");
}

#[test]
fn test_lint_site_empty_site_passes() {
    let tmp = TempDir::new().unwrap();
    let report = lint_site(tmp.path(), &LintConfig::default()).unwrap();
    assert!(report.ok);
    assert_eq!(report.scanned_files, 0);
    assert_eq!(report.rules.len(), rules::catalog().len());
}

#[test]
fn test_lint_site_clean_site_passes() {
    let tmp = clean_site();
    let report = lint_site(tmp.path(), &LintConfig::default()).unwrap();
    assert!(
        report.ok,
        "expected ok, got findings: {:?}",
        report.findings().collect::<Vec<_>>()
    );
    assert_eq!(report.scanned_files, 7);
    assert_eq!(report.failed_files, 0);
    assert_eq!(report.passed_count(), rules::catalog().len());
}

#[test]
fn test_lint_site_reports_each_rule_independently() {
    let tmp = clean_site();
    let root = tmp.path();
    write(
        root,
        "_posts/2021-07-01-Broken.md",
        "---\nlayout: page\ntitle: Broken\nauthors: [grace-hopper]\ntags: [Fun]\nteaser: /assets/img/posts/missing.png\n---\n![x](/assets/img/posts/gone.png)\n",
    );
    write(root, "assets/img/posts/Orphan.PNG", "png");

    let report = lint_site(root, &LintConfig::default()).unwrap();
    assert!(!report.ok);
    assert_eq!(
        failed_ids(&report),
        vec![
            "post-filename",
            "post-layout",
            "post-authors",
            "post-tags",
            "post-teaser",
            "post-images",
            "image-filename",
            "image-unreferenced",
        ]
    );
    let images = report.rules.iter().find(|r| r.id == "post-images").unwrap();
    assert_eq!(images.findings.len(), 1);
    assert_eq!(images.findings[0].line, 8);
}

#[test]
fn test_lint_site_respects_only_and_skip() {
    let tmp = clean_site();
    write(tmp.path(), "_posts/2021-07-01-broken.md", "no front matter\n");

    let mut config = LintConfig::default();
    config.rules.skip = vec![
        "post-front-matter".to_owned(),
        "post-required-fields".to_owned(),
    ];
    let report = lint_site(tmp.path(), &config).unwrap();
    assert!(report.ok, "got: {:?}", failed_ids(&report));
    assert_eq!(report.rules.len(), rules::catalog().len() - 2);

    let mut config = LintConfig::default();
    config.rules.only = vec!["post-front-matter".to_owned()];
    let report = lint_site(tmp.path(), &config).unwrap();
    assert_eq!(report.rules.len(), 1);
    assert_eq!(failed_ids(&report), vec!["post-front-matter"]);
}

#[test]
fn test_lint_site_custom_layout_from_config_file() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        ".blog-lint.yaml",
        "layout:\n  posts_dir: content/posts\nrules:\n  only: [post-layout]\n  post_layout: article\n",
    );
    write(
        root,
        "content/posts/2021-03-14-pi-day.md",
        "---\nlayout: post\n---\n",
    );

    let config = LintConfig::discover(root).unwrap();
    let report = lint_site(root, &config).unwrap();
    assert_eq!(failed_ids(&report), vec!["post-layout"]);
    let finding = &report.rules[0].findings[0];
    assert_eq!(finding.value, "post");
    assert!(finding.message.contains("article"));
}

#[test]
fn test_lint_site_oversized_file_is_scan_error() {
    let tmp = clean_site();
    write(
        tmp.path(),
        "_posts/2021-07-01-long.md",
        &format!("---\ntitle: long\n---\n{}", "x".repeat(4096)),
    );
    let mut config = LintConfig::default();
    config.layout.max_file_size = 1024;

    let report = lint_site(tmp.path(), &config).unwrap();
    assert!(!report.ok);
    assert_eq!(report.failed_files, 1);
    assert_eq!(report.scan_errors[0].kind, ScanErrorKind::FileTooLarge);
    assert!(failed_ids(&report).is_empty());
}

#[test]
fn test_human_output_counts_unscanned_files() {
    let tmp = clean_site();
    write(
        tmp.path(),
        "_posts/2021-07-01-long.md",
        &format!("---\ntitle: long\n---\n{}", "x".repeat(4096)),
    );
    let mut config = LintConfig::default();
    config.layout.max_file_size = 1024;
    let report = lint_site(tmp.path(), &config).unwrap();
    assert_eq!(
        report.files_attempted(),
        report.scanned_files + report.failed_files
    );

    let mut out = Vec::new();
    write_human(&report, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let expected = format!(
        "1 of {} file(s) could not be scanned",
        report.files_attempted()
    );
    assert!(text.contains(&expected), "{text}");
    assert!(text.contains("SCAN ERRORS"), "{text}");
    assert!(text.contains("lint result: FAILED."), "{text}");
}

#[test]
fn test_lint_site_excluded_files_are_ignored() {
    let tmp = clean_site();
    write(tmp.path(), "_posts/drafts/Not A Post.md", "nothing\n");
    let mut config = LintConfig::default();
    config.layout.exclude = vec!["_posts/drafts/*".to_owned()];

    let report = lint_site(tmp.path(), &config).unwrap();
    assert!(report.ok, "got: {:?}", failed_ids(&report));
}

#[test]
fn test_json_output_contract() {
    let tmp = clean_site();
    write(tmp.path(), "_posts/2021-07-01-x.md", "---\nlayout: page\n---\n");
    let mut config = LintConfig::default();
    config.rules.only = vec!["post-layout".to_owned()];
    let report = lint_site(tmp.path(), &config).unwrap();

    let mut out = Vec::new();
    write_json(&report, &mut out).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(json["ok"], false);
    assert!(json["scanned_files"].is_number());
    assert!(json["scan_errors"].as_array().unwrap().is_empty());
    let rule = &json["rules"][0];
    assert_eq!(rule["id"], "post-layout");
    assert_eq!(rule["passed"], false);
    let finding = &rule["findings"][0];
    assert_eq!(finding["rule"], "post-layout");
    assert_eq!(finding["file"], "_posts/2021-07-01-x.md");
    assert_eq!(finding["field"], "layout");
    assert_eq!(finding["value"], "page");
}

#[test]
fn test_human_output() {
    let tmp = clean_site();
    write(tmp.path(), "_posts/2021-07-01-x.md", "---\nlayout: page\n---\n");
    let mut config = LintConfig::default();
    config.rules.only = vec!["post-layout".to_owned(), "post-tags".to_owned()];
    let report = lint_site(tmp.path(), &config).unwrap();

    let mut out = Vec::new();
    write_human(&report, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("rule post-layout ... FAILED"), "{text}");
    assert!(text.contains("rule post-tags ... ok"), "{text}");
    assert!(
        text.contains("_posts/2021-07-01-x.md: Layout must be 'post' [page] (at layout)"),
        "{text}"
    );
    assert!(text.contains("hint: Set 'layout' to the post layout"), "{text}");
    assert!(text.contains("lint result: FAILED. 1 passed; 1 failed"), "{text}");
}
