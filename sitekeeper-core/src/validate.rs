use crate::config::SiteConfig;
use crate::error::{Result, SiteError};
use crate::links::{AnchorIndex, BrokenLink, ExternalLink, check_page_links, site_relative};
use crate::style::{StyleIssue, StyleRules, check_page_style};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use sitekeeper_scanner::{find_html_files, scan_html};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which pages a validation run looks at
#[derive(Debug, Clone, PartialEq)]
pub enum PageSelection {
    /// Fixed list of pages relative to the site root
    Listed(Vec<String>),
    /// Every .html file under the root, minus the skipped directories
    Discover { skip_dirs: Vec<String> },
}

/// Named list of pages a visitor is expected to move through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    pub name: String,
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyResult {
    pub name: String,
    pub missing: Vec<String>,
}

impl JourneyResult {
    pub fn working(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Options for configuring a validation run
pub struct ValidateOptions {
    pub root: PathBuf,
    pub pages: PageSelection,
    pub check_anchors: bool,
    pub style: StyleRules,
    pub journeys: Vec<Journey>,
    pub show_progress_bars: bool,
}

impl ValidateOptions {
    pub fn from_config(root: &Path, config: &SiteConfig) -> Self {
        let pages = match &config.site.pages {
            Some(pages) => PageSelection::Listed(pages.clone()),
            None => PageSelection::Discover {
                skip_dirs: config.site.skip_dirs.clone(),
            },
        };

        Self {
            root: root.to_path_buf(),
            pages,
            check_anchors: config.links.check_anchors,
            style: config.style.clone(),
            journeys: config.journeys.clone(),
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting validation progress
pub type ValidateProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Per-page outcome, in scan order
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    pub file: String,
    pub links: usize,
    pub nav_links: usize,
    pub broken: usize,
    pub style_issues: Vec<StyleIssue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageStyleIssues {
    pub file: String,
    pub issues: Vec<StyleIssue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnreadableFile {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResults {
    pub root: PathBuf,
    pub pages: Vec<PageSummary>,
    pub total_links: usize,
    pub valid_links: usize,
    pub broken_links: Vec<BrokenLink>,
    pub external_links: Vec<ExternalLink>,
    pub style_issues: Vec<PageStyleIssues>,
    pub missing_files: Vec<String>,
    pub unreadable_files: Vec<UnreadableFile>,
    pub journeys: Vec<JourneyResult>,
}

impl ValidationResults {
    pub fn files_scanned(&self) -> usize {
        self.pages.len()
    }

    pub fn style_issue_count(&self) -> usize {
        self.style_issues.len()
    }

    pub fn passed(&self) -> bool {
        self.broken_links.is_empty()
            && self.style_issues.is_empty()
            && self.missing_files.is_empty()
            && self.unreadable_files.is_empty()
    }
}

/// Resolve the site root to an absolute, existing directory
pub fn canonical_root(root: &Path) -> Result<PathBuf> {
    let canonical = fs::canonicalize(root).map_err(|e| SiteError::InvalidRoot {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !canonical.is_dir() {
        return Err(SiteError::InvalidRoot {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    Ok(canonical)
}

/// A journey works when every page on it exists
pub fn check_journeys(root: &Path, journeys: &[Journey]) -> Vec<JourneyResult> {
    journeys
        .iter()
        .map(|journey| JourneyResult {
            name: journey.name.clone(),
            missing: journey
                .pages
                .iter()
                .filter(|page| !root.join(page).is_file())
                .cloned()
                .collect(),
        })
        .collect()
}

/// Execute a validation run with the given options.
///
/// Missing and unreadable pages are recorded and the run moves on; only an unusable
/// site root is an error.
pub fn execute_validation(
    options: ValidateOptions,
    progress_callback: Option<ValidateProgressCallback>,
) -> Result<ValidationResults> {
    let ValidateOptions {
        root,
        pages,
        check_anchors,
        style,
        journeys,
        show_progress_bars,
    } = options;

    let root = canonical_root(&root)?;
    info!("Validating site at {}", root.display());

    let mut results = ValidationResults {
        root: root.clone(),
        ..ValidationResults::default()
    };

    let files = match pages {
        PageSelection::Listed(pages) => {
            let mut files = Vec::new();
            for page in pages {
                let path = root.join(&page);
                if path.is_file() {
                    files.push(path);
                } else {
                    warn!("Page not found: {}", page);
                    if let Some(ref callback) = progress_callback {
                        callback(format!("[!] File not found: {}", page));
                    }
                    results.missing_files.push(page);
                }
            }
            files
        }
        PageSelection::Discover { skip_dirs } => find_html_files(&root, skip_dirs.as_slice())?,
    };

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message("Starting validation...");
        Some(pb)
    } else {
        None
    };

    let mut index = AnchorIndex::new();

    for (idx, path) in files.iter().enumerate() {
        let file = site_relative(&root, path);

        if let Some(ref pb) = progress_bar {
            pb.set_message(format!("Checking {}/{}: {}", idx + 1, files.len(), file));
            pb.tick();
        }
        if let Some(ref callback) = progress_callback
            && files.len() > 1
        {
            callback(format!("Checking page {}/{}: {}", idx + 1, files.len(), file));
        }

        let html = match fs::read_to_string(path) {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to read {}: {}", file, e);
                results.unreadable_files.push(UnreadableFile {
                    file,
                    error: e.to_string(),
                });
                continue;
            }
        };

        let scan = match scan_html(path, &html) {
            Ok(scan) => scan,
            Err(e) => {
                warn!("Failed to scan {}: {}", file, e);
                results.unreadable_files.push(UnreadableFile {
                    file,
                    error: e.to_string(),
                });
                continue;
            }
        };
        index.insert(path.clone(), scan.ids.clone());

        let link_report = check_page_links(&scan, &root, &mut index, check_anchors);
        let style_issues = check_page_style(&scan, &html, &style);
        debug!(
            "{}: {} links, {} broken, {} style issues",
            file,
            link_report.total,
            link_report.broken.len(),
            style_issues.len()
        );

        results.total_links += link_report.total;
        results.valid_links += link_report.valid();
        results.pages.push(PageSummary {
            file: file.clone(),
            links: link_report.total,
            nav_links: link_report.nav_links,
            broken: link_report.broken.len(),
            style_issues: style_issues.clone(),
        });
        results.broken_links.extend(link_report.broken);
        results.external_links.extend(link_report.external);

        if !style_issues.is_empty() {
            results.style_issues.push(PageStyleIssues {
                file,
                issues: style_issues,
            });
        }
    }

    results.journeys = check_journeys(&root, &journeys);

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Validation complete! {} pages checked",
            results.files_scanned()
        ));
    }

    info!(
        "Validation complete: {} pages, {} links, {} broken",
        results.files_scanned(),
        results.total_links,
        results.broken_links.len()
    );
    Ok(results)
}
