#![allow(clippy::unwrap_used)]
//! Tests for the command-line runner, driven through `cli::run`.

use std::fs;
use std::path::Path;

use blog_lint_cli::cli::{Args, Outcome, USAGE_EXIT_CODE, load_config, run};
use clap::Parser;
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

fn site_with_one_post(layout: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        "_posts/2021-03-14-pi-day.md",
        &format!(
            "---\nlayout: {layout}\ntitle: Pi\nauthors: [ada-lovelace]\ntags: [math]\nteaser: /assets/img/posts/pi.png\n---\nText.\n"
        ),
    );
    write(
        root,
        "_developers/ada-lovelace.md",
        "---\nname: Ada\npicture: /assets/img/developers/ada.png\n---\n",
    );
    png(root, "assets/img/posts/pi.png", 600, 300);
    png(root, "assets/img/developers/ada.png", 50, 50);
    tmp
}

fn args(root: &Path, extra: &[&str]) -> Args {
    let root = root.to_string_lossy().into_owned();
    let mut argv = vec!["blog-lint", root.as_str(), "--no-color"];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).unwrap()
}

fn run_to_string(args: &Args) -> (anyhow::Result<Outcome>, String) {
    let mut out = Vec::new();
    let outcome = run(args, &mut out);
    (outcome, String::from_utf8(out).unwrap())
}

#[test]
fn test_exit_codes() {
    assert_eq!(Outcome::Clean.exit_code(), 0);
    assert_eq!(Outcome::Failed.exit_code(), 1);
    assert_eq!(USAGE_EXIT_CODE, 2);
}

#[test]
fn test_clean_site() {
    let tmp = site_with_one_post("post");
    let (outcome, text) = run_to_string(&args(tmp.path(), &[]));
    assert_eq!(outcome.unwrap(), Outcome::Clean, "{text}");
    assert!(text.contains("rule post-layout ... ok"), "{text}");
    assert!(text.contains("lint result: ok. 20 passed; 0 failed"), "{text}");
}

#[test]
fn test_findings_fail_the_run() {
    let tmp = site_with_one_post("page");
    let (outcome, text) = run_to_string(&args(tmp.path(), &[]));
    assert_eq!(outcome.unwrap(), Outcome::Failed);
    assert!(text.contains("rule post-layout ... FAILED"), "{text}");
    assert!(!text.contains("\u{1b}["), "colour escapes with --no-color: {text}");
}

#[test]
fn test_rule_and_skip_flags() {
    let tmp = site_with_one_post("page");

    let (outcome, text) = run_to_string(&args(tmp.path(), &["--skip", "post-layout"]));
    assert_eq!(outcome.unwrap(), Outcome::Clean, "{text}");
    assert!(!text.contains("post-layout"), "{text}");

    let (outcome, text) = run_to_string(&args(
        tmp.path(),
        &["--rule", "post-tags", "--rule", "post-teaser"],
    ));
    assert_eq!(outcome.unwrap(), Outcome::Clean);
    assert!(text.contains("lint result: ok. 2 passed; 0 failed"), "{text}");
}

#[test]
fn test_unknown_rule_is_an_error() {
    let tmp = site_with_one_post("post");
    let (outcome, _) = run_to_string(&args(tmp.path(), &["--rule", "post-colour"]));
    let msg = outcome.unwrap_err().to_string();
    assert!(msg.contains("post-colour"), "got: {msg}");
}

#[test]
fn test_json_format() {
    let tmp = site_with_one_post("page");
    let (outcome, text) = run_to_string(&args(
        tmp.path(),
        &["--format", "json", "--rule", "post-layout"],
    ));
    assert_eq!(outcome.unwrap(), Outcome::Failed);
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["ok"], false);
    assert_eq!(json["rules"][0]["findings"][0]["value"], "page");
}

#[test]
fn test_list_rules() {
    let tmp = TempDir::new().unwrap();
    let (outcome, text) = run_to_string(&args(tmp.path(), &["--list-rules"]));
    assert_eq!(outcome.unwrap(), Outcome::Clean);
    assert_eq!(text.lines().count(), 20);
    assert!(text.lines().next().unwrap().starts_with("post-extension"));
    assert!(text.contains("profile-picture"));
}

#[test]
fn test_explicit_config_file() {
    let tmp = site_with_one_post("article");
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("lint.yaml");
    fs::write(&config_path, "rules:\n  post_layout: article\n").unwrap();

    let config_arg = config_path.to_string_lossy().into_owned();
    let (outcome, text) = run_to_string(&args(tmp.path(), &["--config", &config_arg]));
    assert_eq!(outcome.unwrap(), Outcome::Clean, "{text}");
}

#[test]
fn test_bad_config_file_is_an_error() {
    let tmp = site_with_one_post("post");
    write(tmp.path(), ".blog-lint.yaml", "rules:\n  no_such_option: 1\n");
    let (outcome, _) = run_to_string(&args(tmp.path(), &[]));
    assert!(outcome.is_err());
}

#[test]
fn test_flags_override_config_selection() {
    let tmp = site_with_one_post("post");
    write(
        tmp.path(),
        ".blog-lint.yaml",
        "rules:\n  only: [post-layout]\n  skip: [post-tags]\n",
    );
    let config = load_config(&args(
        tmp.path(),
        &["--rule", "post-date", "--skip", "post-teaser"],
    ))
    .unwrap();
    assert_eq!(config.rules.only, vec!["post-date"]);
    assert_eq!(config.rules.skip, vec!["post-tags", "post-teaser"]);
}

#[test]
fn test_missing_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let (outcome, _) = run_to_string(&args(&tmp.path().join("nope"), &[]));
    let msg = outcome.unwrap_err().to_string();
    assert!(msg.contains("does not exist"), "got: {msg}");
}
