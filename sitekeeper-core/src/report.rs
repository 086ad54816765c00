// Report generation from validation results

use crate::validate::{PageSummary, ValidationResults};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEAVY_RULE: &str = "════════════════════════════════════════════════════════════";
const LIGHT_RULE: &str = "────────────────────────────────────────────────────────────";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Links counted once, in first-seen order
pub fn unique_external_links(results: &ValidationResults) -> Vec<&str> {
    let mut seen = HashSet::new();
    results
        .external_links
        .iter()
        .map(|link| link.href.as_str())
        .filter(|href| seen.insert(*href))
        .collect()
}

fn section(report: &mut String, title: &str) {
    report.push_str(&format!("\n{}\n{}\n{}\n\n", HEAVY_RULE, title, HEAVY_RULE));
}

fn push_page(report: &mut String, page: &PageSummary) {
    report.push_str(&format!("📄 {}\n", page.file));
    report.push_str(&format!(
        "  Found {} links ({} in navigation)\n",
        page.links, page.nav_links
    ));

    if page.style_issues.is_empty() {
        report.push_str("  ✓ Style standards maintained\n");
    } else {
        for issue in &page.style_issues {
            report.push_str(&format!("  ⚠ {}\n", issue));
        }
    }

    if page.broken == 0 {
        report.push_str(&format!("  ✓ All {} link(s) working\n", page.links));
    } else {
        report.push_str(&format!("  ✗ {} broken link(s)\n", page.broken));
    }
    report.push('\n');
}

pub fn generate_text_report(results: &ValidationResults) -> String {
    let mut report = String::new();

    section(&mut report, "VALIDATION SUMMARY");
    report.push_str(&format!("Site Root:             {}\n", results.root.display()));
    report.push_str(&format!("Files Scanned:         {}\n", results.files_scanned()));
    report.push_str(&format!("Total Links Checked:   {}\n", results.total_links));
    report.push_str(&format!("Valid Links:           {}\n", results.valid_links));
    report.push_str(&format!("Broken Links:          {}\n", results.broken_links.len()));
    report.push_str(&format!("External Links:        {}\n", results.external_links.len()));
    report.push_str(&format!("Style Issues:          {}\n", results.style_issue_count()));
    if !results.missing_files.is_empty() {
        report.push_str(&format!("Missing Files:         {}\n", results.missing_files.len()));
    }
    if !results.unreadable_files.is_empty() {
        report.push_str(&format!("Unreadable Files:      {}\n", results.unreadable_files.len()));
    }

    if !results.pages.is_empty() {
        section(&mut report, "PAGES");
        for page in &results.pages {
            push_page(&mut report, page);
        }
    }

    if !results.missing_files.is_empty() || !results.unreadable_files.is_empty() {
        section(&mut report, "FILES NOT CHECKED");
        for file in &results.missing_files {
            report.push_str(&format!("  ✗ {} (file not found)\n", file));
        }
        for file in &results.unreadable_files {
            report.push_str(&format!("  ✗ {} ({})\n", file.file, file.error));
        }
    }

    if !results.broken_links.is_empty() {
        section(&mut report, "BROKEN LINKS");
        for link in &results.broken_links {
            report.push_str(&format!("File:        {}\n", link.file));
            report.push_str(&format!("Link:        {}\n", link.href));
            report.push_str(&format!("Text:        \"{}\"\n", link.text));
            report.push_str(&format!("Reason:      {}\n", link.reason));
            report.push_str(&format!("Resolved to: {}\n", link.resolved));
            report.push_str(LIGHT_RULE);
            report.push('\n');
        }
    }

    let external = unique_external_links(results);
    if !external.is_empty() {
        section(&mut report, "EXTERNAL LINKS (manual check required)");
        for href in external {
            report.push_str(&format!("  • {}\n", href));
        }
    }

    if !results.style_issues.is_empty() {
        section(&mut report, "STYLE CONSISTENCY ISSUES");
        for page in &results.style_issues {
            report.push_str(&format!("{}:\n", page.file));
            for issue in &page.issues {
                report.push_str(&format!("  • {}\n", issue));
            }
            report.push('\n');
        }
    }

    if !results.journeys.is_empty() {
        section(&mut report, "NAVIGATION PATHS");
        for journey in &results.journeys {
            if journey.working() {
                report.push_str(&format!("  ✓ {}\n", journey.name));
            } else {
                report.push_str(&format!(
                    "  ✗ {} (missing: {})\n",
                    journey.name,
                    journey.missing.join(", ")
                ));
            }
        }
    }

    report.push_str(&format!("\n{}\n", HEAVY_RULE));
    if results.passed() {
        report.push_str("VALIDATION PASSED\n");
        report.push_str("All internal links work and style standards are maintained.\n");
    } else {
        report.push_str("ISSUES FOUND - please review above\n");
    }
    report.push_str(&format!("{}\n", HEAVY_RULE));

    report
}

pub fn generate_json_report(results: &ValidationResults) -> Result<String, serde_json::Error> {
    let pages: Vec<serde_json::Value> = results
        .pages
        .iter()
        .map(|page| {
            serde_json::json!({
                "file": page.file,
                "links": page.links,
                "navLinks": page.nav_links,
                "brokenLinks": page.broken,
                "styleIssues": page.style_issues.iter().map(|issue| issue.to_string()).collect::<Vec<_>>()
            })
        })
        .collect();

    let style_issues: Vec<serde_json::Value> = results
        .style_issues
        .iter()
        .map(|page| {
            serde_json::json!({
                "file": page.file,
                "issues": page.issues.iter().map(|issue| issue.to_string()).collect::<Vec<_>>()
            })
        })
        .collect();

    let unreadable: Vec<serde_json::Value> = results
        .unreadable_files
        .iter()
        .map(|file| serde_json::json!({ "file": file.file, "error": file.error }))
        .collect();

    let journeys: Vec<serde_json::Value> = results
        .journeys
        .iter()
        .map(|journey| {
            serde_json::json!({
                "name": journey.name,
                "working": journey.working(),
                "missing": journey.missing
            })
        })
        .collect();

    let json_report = serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "generator": {
            "name": "Sitekeeper",
            "version": env!("CARGO_PKG_VERSION")
        },
        "root": results.root.display().to_string(),
        "passed": results.passed(),
        "summary": {
            "filesScanned": results.files_scanned(),
            "totalLinks": results.total_links,
            "validLinks": results.valid_links,
            "brokenLinksCount": results.broken_links.len(),
            "externalLinksCount": results.external_links.len(),
            "styleIssuesCount": results.style_issue_count(),
            "missingFilesCount": results.missing_files.len()
        },
        "pages": pages,
        "brokenLinks": results.broken_links,
        "externalLinks": results.external_links,
        "styleIssues": style_issues,
        "missingFiles": results.missing_files,
        "unreadableFiles": unreadable,
        "journeys": journeys
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
