use crate::error::{Result, ScanError};
use crate::result::{LinkKind, LinkRecord, PageScan};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href]").expect("Failed to parse link selector - this is a bug")
});

static ID_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[id]").expect("Failed to parse id selector - this is a bug"));

static NAV_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("nav").expect("Failed to parse nav selector - this is a bug"));

static FOOTER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("footer").expect("Failed to parse footer selector - this is a bug")
});

static STYLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("style").expect("Failed to parse style selector - this is a bug")
});

/// Read an HTML file from disk and scan it
pub fn scan_file(path: &Path) -> Result<PageScan> {
    let html = fs::read_to_string(path).map_err(|source| ScanError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    scan_html(path, &html)
}

/// Scan an already loaded document. `path` is only recorded on the result.
pub fn scan_html(path: &Path, html: &str) -> Result<PageScan> {
    let document = Html::parse_document(html);
    let mut scan = PageScan::new(path.to_path_buf());

    for element in document.select(&LINK_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let mut record = LinkRecord::new(href, element_text(&element), classify_href(href));
        record.in_nav = inside_nav(&element);
        if record.in_nav {
            scan.nav_links += 1;
        }

        debug!("Found link: {} ({})", record.href, record.kind.as_str());
        scan.links.push(record);
    }

    scan.ids = ids_in(&document);
    scan.has_nav = document.select(&NAV_SELECTOR).next().is_some();
    scan.has_footer = document.select(&FOOTER_SELECTOR).next().is_some();

    let styles: Vec<String> = document
        .select(&STYLE_SELECTOR)
        .map(|style| style.text().collect::<String>())
        .collect();
    if !styles.is_empty() {
        scan.style_text = Some(styles.join("\n"));
    }

    Ok(scan)
}

/// Every element id present in the document
pub fn collect_ids(html: &str) -> Result<HashSet<String>> {
    Ok(ids_in(&Html::parse_document(html)))
}

/// Decide how an href is treated before any filesystem resolution happens
pub fn classify_href(href: &str) -> LinkKind {
    let href = href.trim();

    if href.is_empty() || href == "#" {
        return LinkKind::Placeholder;
    }
    if href.starts_with('#') {
        return LinkKind::Fragment;
    }
    if href.starts_with("//") {
        return LinkKind::External;
    }

    // Relative paths fail to parse without a base, anything that parses carries a scheme
    match Url::parse(href) {
        Ok(url) => match url.scheme() {
            "mailto" | "tel" => LinkKind::Contact,
            "javascript" => LinkKind::Script,
            _ => LinkKind::External,
        },
        Err(_) => LinkKind::Internal,
    }
}

fn ids_in(document: &Html) -> HashSet<String> {
    document
        .select(&ID_SELECTOR)
        .filter_map(|element| element.value().attr("id"))
        .map(|id| id.to_string())
        .collect()
}

fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn inside_nav(element: &ElementRef) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|parent| parent.name() == "nav")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PAGE: &str = r##"<!DOCTYPE html>
<html>
<head>
    <style>:root { --primary-blue: #1a2b4c; } .main-nav { display: flex; }</style>
</head>
<body>
    <nav class="main-nav">
        <a href="index.html">Home</a>
        <a href="about.html#team">About   the
            team</a>
    </nav>
    <main id="content">
        <h2 id="features">Features</h2>
        <a href="#features">Jump</a>
        <a href="#">Top</a>
        <a href="https://example.com/">Example</a>
        <a href="mailto:someone@example.com">Mail</a>
        <a href="javascript:void(0)">Noop</a>
        <a>No href</a>
    </main>
    <footer>Footer</footer>
</body>
</html>"##;

    #[test]
    fn test_scan_html_collects_links() {
        let scan = scan_html(Path::new("index.html"), PAGE).unwrap();

        assert_eq!(scan.links.len(), 7);
        assert_eq!(scan.nav_links, 2);
        assert_eq!(scan.links[0].href, "index.html");
        assert!(scan.links[0].in_nav);
        assert_eq!(scan.links[1].text, "About the team");
        assert!(!scan.links[2].in_nav);
    }

    #[test]
    fn test_scan_html_structure() {
        let scan = scan_html(Path::new("index.html"), PAGE).unwrap();

        assert!(scan.has_nav);
        assert!(scan.has_footer);
        assert!(scan.has_id("features"));
        assert!(scan.has_id("content"));
        assert!(!scan.has_id("team"));
        assert!(scan.style_text.unwrap().contains("--primary-blue"));
    }

    #[test]
    fn test_scan_html_without_style_or_nav() {
        let scan = scan_html(Path::new("bare.html"), "<html><body><p>Hi</p></body></html>").unwrap();

        assert!(scan.links.is_empty());
        assert!(!scan.has_nav);
        assert!(!scan.has_footer);
        assert!(scan.style_text.is_none());
    }

    #[test]
    fn test_scan_html_joins_style_blocks() {
        let html = "<html><head><style>a{}</style><style>:root{--accent-red:red}</style></head></html>";
        let scan = scan_html(Path::new("x.html"), html).unwrap();
        let style = scan.style_text.unwrap();

        assert!(style.contains("a{}"));
        assert!(style.contains("--accent-red"));
    }

    #[test]
    fn test_shared_selectors_across_documents() {
        let first = scan_html(Path::new("index.html"), PAGE).unwrap();
        let second = scan_html(Path::new("bare.html"), "<nav><a href=\"a.html\">A</a></nav>").unwrap();
        let third = scan_html(Path::new("index.html"), PAGE).unwrap();

        assert_eq!(second.links.len(), 1);
        assert_eq!(second.nav_links, 1);
        assert!(second.ids.is_empty());
        assert_eq!(first, third);
    }

    #[test]
    fn test_classify_href() {
        assert_eq!(classify_href(""), LinkKind::Placeholder);
        assert_eq!(classify_href("#"), LinkKind::Placeholder);
        assert_eq!(classify_href("#about"), LinkKind::Fragment);
        assert_eq!(classify_href("https://example.com"), LinkKind::External);
        assert_eq!(classify_href("http://example.com/a"), LinkKind::External);
        assert_eq!(classify_href("//cdn.example.com/x.js"), LinkKind::External);
        assert_eq!(classify_href("mailto:a@b.com"), LinkKind::Contact);
        assert_eq!(classify_href("tel:+441234"), LinkKind::Contact);
        assert_eq!(classify_href("javascript:void(0)"), LinkKind::Script);
        assert_eq!(classify_href("about.html"), LinkKind::Internal);
        assert_eq!(classify_href("../index.html#top"), LinkKind::Internal);
        assert_eq!(classify_href("/legal/terms.html"), LinkKind::Internal);
    }

    #[test]
    fn test_collect_ids() {
        let ids = collect_ids(r#"<div id="a"><section id="b"></section><p></p></div>"#).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("a"));
        assert!(ids.contains("b"));
    }

    #[test]
    fn test_scan_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{}", PAGE)?;

        let scan = scan_file(file.path())?;
        assert_eq!(scan.path, file.path());
        assert_eq!(scan.links_of_kind(LinkKind::Internal).count(), 2);
        Ok(())
    }

    #[test]
    fn test_scan_file_missing() {
        let result = scan_file(Path::new("/definitely/not/here.html"));
        assert!(matches!(result, Err(ScanError::ReadError { .. })));
    }
}
