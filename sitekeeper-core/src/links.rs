// Internal link resolution and checking

use serde::Serialize;
use sitekeeper_scanner::{LinkKind, LinkRecord, PageScan, collect_ids};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

/// Where an internal href points on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub path: PathBuf,
    pub fragment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum BrokenReason {
    FileNotFound,
    AnchorNotFound(String),
}

impl fmt::Display for BrokenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokenReason::FileNotFound => write!(f, "File not found"),
            BrokenReason::AnchorNotFound(id) => write!(f, "Anchor #{} not found", id),
        }
    }
}

impl From<BrokenReason> for String {
    fn from(reason: BrokenReason) -> Self {
        reason.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenLink {
    pub file: String,
    pub href: String,
    pub text: String,
    pub resolved: String,
    pub reason: BrokenReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalLink {
    pub file: String,
    pub href: String,
    pub text: String,
}

/// Outcome of checking every link on one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLinkReport {
    pub total: usize,
    pub nav_links: usize,
    pub external: Vec<ExternalLink>,
    pub broken: Vec<BrokenLink>,
}

impl PageLinkReport {
    /// Everything that is neither external nor broken
    pub fn valid(&self) -> usize {
        self.total - self.external.len() - self.broken.len()
    }
}

/// Lazily loaded element ids per target page, so each file is parsed once per run
#[derive(Debug, Default)]
pub struct AnchorIndex {
    pages: HashMap<PathBuf, HashSet<String>>,
}

impl AnchorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the index with ids already collected by a page scan
    pub fn insert(&mut self, path: PathBuf, ids: HashSet<String>) {
        self.pages.insert(path, ids);
    }

    pub fn contains(&mut self, path: &Path, id: &str) -> bool {
        if !self.pages.contains_key(path) {
            let ids = match fs::read_to_string(path).map(|html| collect_ids(&html)) {
                Ok(Ok(ids)) => ids,
                Ok(Err(e)) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    HashSet::new()
                }
                Err(e) => {
                    warn!("Failed to read {}: {}", path.display(), e);
                    HashSet::new()
                }
            };
            self.pages.insert(path.to_path_buf(), ids);
        }

        self.pages.get(path).is_some_and(|ids| ids.contains(id))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Resolve an internal href against the page it appears on.
///
/// Paths starting with `/` are resolved against the site root. The query string is
/// dropped and percent-encoding decoded. An href with an empty path (`#top`, `?a=b#top`)
/// targets the page itself. Both `page` and `site_root` must be absolute.
pub fn resolve_href(page: &Path, href: &str, site_root: &Path) -> Option<LinkTarget> {
    let href = href.trim();
    let (path_part, fragment) = match href.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (href, None),
    };
    let fragment = fragment.filter(|f| !f.is_empty()).map(|f| f.to_string());
    let path_part = path_part.split('?').next().unwrap_or_default();

    if path_part.is_empty() {
        return Some(LinkTarget {
            path: page.to_path_buf(),
            fragment,
        });
    }

    let joined = if let Some(site_absolute) = path_part.strip_prefix('/') {
        Url::from_directory_path(site_root).ok()?.join(site_absolute).ok()?
    } else {
        Url::from_file_path(page).ok()?.join(path_part).ok()?
    };

    let mut path = joined.to_file_path().ok()?;
    // A directory link is served by its index page
    if path.is_dir() {
        path = path.join("index.html");
    }

    Some(LinkTarget { path, fragment })
}

/// Display a path relative to the site root with forward slashes
pub fn site_relative(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Check every link of a scanned page
pub fn check_page_links(
    scan: &PageScan,
    site_root: &Path,
    index: &mut AnchorIndex,
    check_anchors: bool,
) -> PageLinkReport {
    let file = site_relative(site_root, &scan.path);
    let mut report = PageLinkReport {
        total: scan.links.len(),
        nav_links: scan.nav_links,
        ..PageLinkReport::default()
    };

    for link in &scan.links {
        match link.kind {
            LinkKind::External => report.external.push(ExternalLink {
                file: file.clone(),
                href: link.href.clone(),
                text: link.text.clone(),
            }),
            LinkKind::Placeholder | LinkKind::Contact | LinkKind::Script => {
                debug!("Ignoring {} link {}", link.kind.as_str(), link.href);
            }
            LinkKind::Fragment | LinkKind::Internal => {
                if let Some(reason) = check_link(scan, link, site_root, index, check_anchors) {
                    let resolved = resolve_href(&scan.path, &link.href, site_root)
                        .map(|target| target.path.display().to_string())
                        .unwrap_or_else(|| link.href.clone());
                    report.broken.push(BrokenLink {
                        file: file.clone(),
                        href: link.href.clone(),
                        text: link.text.clone(),
                        resolved,
                        reason,
                    });
                }
            }
        }
    }

    report
}

fn check_link(
    scan: &PageScan,
    link: &LinkRecord,
    site_root: &Path,
    index: &mut AnchorIndex,
    check_anchors: bool,
) -> Option<BrokenReason> {
    let Some(target) = resolve_href(&scan.path, &link.href, site_root) else {
        return Some(BrokenReason::FileNotFound);
    };

    if !target.path.is_file() {
        return Some(BrokenReason::FileNotFound);
    }

    match target.fragment {
        Some(fragment) if check_anchors => {
            let found = if target.path == scan.path {
                scan.has_id(&fragment)
            } else {
                index.contains(&target.path, &fragment)
            };
            (!found).then_some(BrokenReason::AnchorNotFound(fragment))
        }
        _ => None,
    }
}
