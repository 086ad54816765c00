// Style convention checks for scanned pages

use serde::{Deserialize, Serialize};
use sitekeeper_scanner::PageScan;
use std::fmt;

/// Literal text every page is expected to contain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub text: String,
    pub message: String,
}

impl Marker {
    pub fn new(text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleRules {
    pub markers: Vec<Marker>,
    pub css_variables: Vec<String>,
    pub require_nav: bool,
    pub nav_selectors: Vec<String>,
    pub require_footer: bool,
}

impl Default for StyleRules {
    fn default() -> Self {
        Self {
            markers: vec![
                Marker::new("FINAL_JUSTICE_GUARDIAN.svg", "Missing header hero image"),
                Marker::new("FINAL_JUSTICE_GUARDIAN_FOOTER.svg", "Missing footer image"),
                Marker::new("Libre Baskerville", "Missing Libre Baskerville font"),
                Marker::new("Source Sans Pro", "Missing Source Sans Pro font"),
            ],
            css_variables: vec![
                "--primary-blue".to_string(),
                "--accent-red".to_string(),
                "--text-dark".to_string(),
            ],
            require_nav: true,
            nav_selectors: vec![".main-nav".to_string(), ".nav-bar".to_string()],
            require_footer: true,
        }
    }
}

impl StyleRules {
    /// Rules that flag nothing
    pub fn none() -> Self {
        Self {
            markers: Vec::new(),
            css_variables: Vec::new(),
            require_nav: false,
            nav_selectors: Vec::new(),
            require_footer: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleIssue {
    MissingMarker(String),
    NoStyleTag,
    MissingCssVariable(String),
    MissingNav,
    MissingNavStyles,
    MissingFooter,
}

impl fmt::Display for StyleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleIssue::MissingMarker(message) => write!(f, "{}", message),
            StyleIssue::NoStyleTag => write!(f, "No <style> tag found"),
            StyleIssue::MissingCssVariable(name) => write!(f, "Missing CSS variable: {}", name),
            StyleIssue::MissingNav => write!(f, "Missing <nav> element"),
            StyleIssue::MissingNavStyles => write!(f, "Missing navigation styles"),
            StyleIssue::MissingFooter => write!(f, "Missing <footer> element"),
        }
    }
}

/// Raw-text checks: each marker missing from the page source is an issue
pub fn check_markers(html: &str, rules: &StyleRules) -> Vec<StyleIssue> {
    rules
        .markers
        .iter()
        .filter(|marker| !html.contains(&marker.text))
        .map(|marker| StyleIssue::MissingMarker(marker.message.clone()))
        .collect()
}

/// DOM checks against the style blocks, `<nav>` and `<footer>`
pub fn check_structure(scan: &PageScan, rules: &StyleRules) -> Vec<StyleIssue> {
    let mut issues = Vec::new();

    let needs_style =
        !rules.css_variables.is_empty() || (rules.require_nav && !rules.nav_selectors.is_empty());
    let style = scan.style_text.as_deref();

    // Without a style block nothing below can be checked meaningfully
    if needs_style && style.is_none() {
        issues.push(StyleIssue::NoStyleTag);
        return issues;
    }
    let style = style.unwrap_or_default();

    for variable in &rules.css_variables {
        if !style.contains(variable.as_str()) {
            issues.push(StyleIssue::MissingCssVariable(variable.clone()));
        }
    }

    if rules.require_nav {
        if !scan.has_nav {
            issues.push(StyleIssue::MissingNav);
        } else if !rules.nav_selectors.is_empty()
            && !rules.nav_selectors.iter().any(|selector| style.contains(selector.as_str()))
        {
            issues.push(StyleIssue::MissingNavStyles);
        }
    }

    if rules.require_footer && !scan.has_footer {
        issues.push(StyleIssue::MissingFooter);
    }

    issues
}

/// Markers first, then structure
pub fn check_page_style(scan: &PageScan, html: &str, rules: &StyleRules) -> Vec<StyleIssue> {
    let mut issues = check_markers(html, rules);
    issues.extend(check_structure(scan, rules));
    issues
}
