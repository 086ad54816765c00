use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// How an `href` should be treated by the link checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    /// Absolute URL on another host (http, https, protocol-relative, ...)
    External,
    /// mailto: and tel:
    Contact,
    /// javascript:
    Script,
    /// Empty href or a bare `#`
    Placeholder,
    /// Same-page anchor, `#section`
    Fragment,
    /// Relative or site-absolute path to another file of the site
    Internal,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::External => "external",
            LinkKind::Contact => "contact",
            LinkKind::Script => "script",
            LinkKind::Placeholder => "placeholder",
            LinkKind::Fragment => "fragment",
            LinkKind::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub href: String,
    pub text: String,
    pub kind: LinkKind,
    pub in_nav: bool,
}

impl LinkRecord {
    pub fn new(href: impl Into<String>, text: impl Into<String>, kind: LinkKind) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
            kind,
            in_nav: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageScan {
    pub path: PathBuf,
    pub links: Vec<LinkRecord>,
    pub nav_links: usize,
    pub ids: HashSet<String>,
    pub has_nav: bool,
    pub has_footer: bool,
    /// Text of every `<style>` block, `None` when the page has none
    pub style_text: Option<String>,
}

impl PageScan {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            links: Vec::new(),
            nav_links: 0,
            ids: HashSet::new(),
            has_nav: false,
            has_footer: false,
            style_text: None,
        }
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn links_of_kind(&self, kind: LinkKind) -> impl Iterator<Item = &LinkRecord> {
        self.links.iter().filter(move |l| l.kind == kind)
    }
}
