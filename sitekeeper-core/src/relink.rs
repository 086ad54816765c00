// Rewriting internal links after pages moved between folders

use crate::error::Result;
use crate::links::site_relative;
use crate::validate::canonical_root;
use regex::{Captures, Regex};
use sitekeeper_scanner::{find_html_files, page_depth};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static INDEX_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href=["']index\.html(#[^"']+)["']"#)
        .expect("Failed to compile index anchor regex")
});

/// Old file name -> new location relative to the site root
pub type LinkMap = BTreeMap<String, String>;

/// Result of rewriting one document in memory
#[derive(Debug, Clone, PartialEq)]
pub struct Rewrite {
    pub content: String,
    pub replacements: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileChange {
    Updated { replacements: usize },
    Unchanged,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub file: String,
    pub change: FileChange,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteRewriteSummary {
    pub outcomes: Vec<FileOutcome>,
    pub dry_run: bool,
}

impl SiteRewriteSummary {
    pub fn updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.change, FileChange::Updated { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.change, FileChange::Failed(_)))
            .count()
    }

    pub fn replacements(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.change {
                FileChange::Updated { replacements } => replacements,
                _ => 0,
            })
            .sum()
    }
}

/// Relative link from the directory of `from_file` to `to_file`, with forward slashes
pub fn relative_link(from_file: &Path, to_file: &Path) -> String {
    let from_dir: Vec<Component> = from_file
        .parent()
        .map(|dir| dir.components().collect())
        .unwrap_or_default();
    let target: Vec<Component> = to_file.components().collect();

    let common = from_dir
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from_dir.len() - common];
    parts.extend(
        target[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

/// Rewrites `href`/`url:` references to moved pages in a single pass
pub struct LinkRewriter {
    pattern: Option<Regex>,
    map: LinkMap,
}

impl LinkRewriter {
    pub fn new(map: LinkMap) -> Result<Self> {
        let pattern = if map.is_empty() {
            None
        } else {
            let names = map
                .keys()
                .map(|name| regex::escape(name))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(
                r#"(href=|url: )["'](?:\./)?({})["']"#,
                names
            ))?)
        };

        Ok(Self { pattern, map })
    }

    /// Rewrite every reference in `content`, which lives at `page` inside `site_root`
    pub fn rewrite(&self, content: &str, page: &Path, site_root: &Path) -> Rewrite {
        let Some(ref pattern) = self.pattern else {
            return Rewrite {
                content: content.to_string(),
                replacements: 0,
            };
        };

        let mut replacements = 0;
        let rewritten = pattern.replace_all(content, |caps: &Captures| {
            let original = &caps[0];
            let Some(new_location) = self.map.get(&caps[2]) else {
                return original.to_string();
            };

            let relative = relative_link(page, &site_root.join(new_location));
            let replacement = if caps[1].starts_with("href") {
                format!(r#"href="{}""#, relative)
            } else {
                format!("url: '{}'", relative)
            };

            if replacement != original {
                replacements += 1;
            }
            replacement
        });

        Rewrite {
            content: rewritten.into_owned(),
            replacements,
        }
    }
}

/// Point `index.html#anchor` links at the root index from pages `depth` folders down
pub fn fix_index_anchor_links(content: &str, depth: usize) -> Rewrite {
    let prefix = "../".repeat(depth);

    let mut replacements = 0;
    let rewritten = INDEX_ANCHOR_RE.replace_all(content, |caps: &Captures| {
        let replacement = format!(r#"href="{}index.html{}""#, prefix, &caps[1]);
        if replacement != caps[0] {
            replacements += 1;
        }
        replacement
    });

    Rewrite {
        content: rewritten.into_owned(),
        replacements,
    }
}

/// Rewrite links to moved pages across the whole site
pub fn relink_site<S: AsRef<str>>(
    root: &Path,
    skip_dirs: &[S],
    map: &LinkMap,
    dry_run: bool,
) -> Result<SiteRewriteSummary> {
    let rewriter = LinkRewriter::new(map.clone())?;
    let root = canonical_root(root)?;
    info!("Relinking {} mapped pages under {}", map.len(), root.display());

    rewrite_site(&root, skip_dirs, dry_run, |content, path| {
        Ok(rewriter.rewrite(content, path, &root))
    })
}

/// Fix `index.html#anchor` links by page depth across the whole site
pub fn fix_index_links_site<S: AsRef<str>>(
    root: &Path,
    skip_dirs: &[S],
    dry_run: bool,
) -> Result<SiteRewriteSummary> {
    let root = canonical_root(root)?;
    info!("Fixing index anchor links under {}", root.display());

    rewrite_site(&root, skip_dirs, dry_run, |content, path| {
        Ok(fix_index_anchor_links(content, page_depth(&root, path)))
    })
}

fn rewrite_site<S, F>(
    root: &Path,
    skip_dirs: &[S],
    dry_run: bool,
    rewrite: F,
) -> Result<SiteRewriteSummary>
where
    S: AsRef<str>,
    F: Fn(&str, &Path) -> Result<Rewrite>,
{
    let files = find_html_files(root, skip_dirs)?;
    let mut summary = SiteRewriteSummary {
        outcomes: Vec::with_capacity(files.len()),
        dry_run,
    };

    for path in files {
        let file = site_relative(root, &path);
        let change = match rewrite_file(&path, dry_run, &rewrite) {
            Ok(0) => FileChange::Unchanged,
            Ok(replacements) => FileChange::Updated { replacements },
            Err(e) => {
                warn!("Error processing {}: {}", file, e);
                FileChange::Failed(e.to_string())
            }
        };
        debug!("{}: {:?}", file, change);
        summary.outcomes.push(FileOutcome { file, change });
    }

    Ok(summary)
}

fn rewrite_file<F>(path: &Path, dry_run: bool, rewrite: &F) -> Result<usize>
where
    F: Fn(&str, &Path) -> Result<Rewrite>,
{
    let content = fs::read_to_string(path)?;
    let rewritten = rewrite(&content, path)?;

    if rewritten.content == content {
        return Ok(0);
    }
    if !dry_run {
        fs::write(path, &rewritten.content)?;
    }
    Ok(rewritten.replacements)
}
