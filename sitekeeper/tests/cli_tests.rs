// Runs the sitekeeper binary against small on-disk sites

use sitekeeper_core::config::CONFIG_FILE_NAME;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const PLAIN_STYLE: &str = r#"
[style]
markers = []
css_variables = []
require_nav = false
nav_selectors = []
require_footer = false
"#;

fn sitekeeper(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sitekeeper"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run sitekeeper")
}

fn small_site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(
        root.join("index.html"),
        r##"<nav><a href="about.html">About</a></nav><a href="about.html#team">Team</a>"##,
    )
    .unwrap();
    fs::write(root.join("about.html"), r#"<h2 id="team">Team</h2>"#).unwrap();
    fs::write(root.join(CONFIG_FILE_NAME), PLAIN_STYLE).unwrap();
    dir
}

fn root_arg(root: &Path) -> String {
    root.display().to_string()
}

// ============================================================================
// validate -f json
// ============================================================================

#[test]
fn test_validate_json_stdout_is_only_json() {
    let site = small_site();
    let root = root_arg(site.path());

    let output = sitekeeper(&["validate", &root, "-f", "json", "--no-report"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["passed"], true);
    assert_eq!(value["summary"]["filesScanned"], 2);
    assert_eq!(value["summary"]["totalLinks"], 2);
    assert!(!stdout.contains("SITE VALIDATION"));
}

#[test]
fn test_validate_json_saved_notice_goes_to_stderr() {
    let site = small_site();
    let root = root_arg(site.path());

    let output = sitekeeper(&["validate", &root, "-f", "json"]);

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&stdout).is_ok());
    assert!(!stdout.contains("Report saved to"));
    assert!(stderr.contains("Report saved to"));
    assert!(site.path().join("validation-report.json").exists());
}

#[test]
fn test_validate_json_failure_keeps_stdout_parseable() {
    let site = small_site();
    fs::write(
        site.path().join("index.html"),
        r#"<a href="missing.html">Gone</a>"#,
    )
    .unwrap();
    let root = root_arg(site.path());

    let output = sitekeeper(&["validate", &root, "-f", "json", "--no-report", "-v"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["passed"], false);
    assert_eq!(value["summary"]["brokenLinksCount"], 1);
}

// ============================================================================
// validate (text)
// ============================================================================

#[test]
fn test_validate_text_keeps_header() {
    let site = small_site();
    let root = root_arg(site.path());

    let output = sitekeeper(&["validate", &root, "--no-report"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("SITE VALIDATION"));
    assert!(stdout.contains("VALIDATION SUMMARY"));
}
