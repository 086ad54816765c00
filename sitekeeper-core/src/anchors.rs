// Placeholder anchor sections so in-page navigation targets exist

use crate::error::Result;
use crate::validate::canonical_root;
use serde::{Deserialize, Serialize};
use sitekeeper_scanner::collect_ids;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Element the sections are appended to, right before its closing tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    Article,
    Main,
    /// `<article>` when the page has one, `<main>` otherwise
    #[default]
    Auto,
}

impl Container {
    fn closing_tags(&self) -> &'static [&'static str] {
        match self {
            Container::Article => &["</article>"],
            Container::Main => &["</main>"],
            Container::Auto => &["</article>", "</main>"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorSection {
    pub id: String,
    pub heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorPlan {
    /// Page relative to the site root
    pub file: String,
    #[serde(default)]
    pub container: Container,
    #[serde(default = "default_heading_tag")]
    pub heading_tag: String,
    #[serde(default = "default_section_style")]
    pub section_style: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_style: Option<String>,
    #[serde(default = "default_body_style")]
    pub body_style: String,
    pub sections: Vec<AnchorSection>,
}

fn default_heading_tag() -> String {
    "h2".to_string()
}

fn default_section_style() -> String {
    "scroll-margin-top: 100px; margin-top: 2rem;".to_string()
}

fn default_body_style() -> String {
    "color: var(--text-grey); font-size: 1.1rem;".to_string()
}

impl AnchorPlan {
    pub fn new(file: impl Into<String>, sections: Vec<AnchorSection>) -> Self {
        Self {
            file: file.into(),
            container: Container::default(),
            heading_tag: default_heading_tag(),
            section_style: default_section_style(),
            heading_class: None,
            heading_style: None,
            body_style: default_body_style(),
            sections,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Injection {
    Inserted { content: String, ids: Vec<String> },
    /// Every planned id already exists on the page
    AlreadyPresent,
    /// The page has no closing tag to insert before
    NoContainer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FixStatus {
    Inserted(Vec<String>),
    AlreadyPresent,
    NoContainer,
    MissingFile,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixOutcome {
    pub file: String,
    pub status: FixStatus,
}

/// Render sections as HTML, indented for a top-level `<main>`/`<article>` child
pub fn render_sections(plan: &AnchorPlan, sections: &[&AnchorSection]) -> String {
    let tag = &plan.heading_tag;
    let mut heading_attrs = String::new();
    if let Some(ref class) = plan.heading_class {
        heading_attrs.push_str(&format!(r#" class="{}""#, class));
    }
    if let Some(ref style) = plan.heading_style {
        heading_attrs.push_str(&format!(r#" style="{}""#, style));
    }

    let mut html = String::from("\n        <!-- Anchor sections for navigation -->\n");
    for section in sections {
        html.push_str(&format!(
            "        <section id=\"{}\" style=\"{}\">\n",
            section.id, plan.section_style
        ));
        html.push_str(&format!(
            "            <{tag}{}>{}</{tag}>\n",
            heading_attrs, section.heading
        ));
        if let Some(ref body) = section.body {
            html.push_str(&format!(
                "            <p style=\"{}\">{}</p>\n",
                plan.body_style, body
            ));
        }
        html.push_str("        </section>\n");
    }
    html
}

/// Insert the plan's sections whose ids the page does not have yet
pub fn inject_sections(content: &str, plan: &AnchorPlan) -> Result<Injection> {
    let existing = collect_ids(content)?;
    let missing: Vec<&AnchorSection> = plan
        .sections
        .iter()
        .filter(|section| !existing.contains(&section.id))
        .collect();

    if missing.is_empty() {
        return Ok(Injection::AlreadyPresent);
    }

    let Some(position) = plan
        .container
        .closing_tags()
        .iter()
        .find_map(|tag| content.find(tag))
    else {
        return Ok(Injection::NoContainer);
    };

    let mut updated = String::with_capacity(content.len() + 512 * missing.len());
    updated.push_str(&content[..position]);
    updated.push_str(&render_sections(plan, &missing));
    updated.push_str("\n    ");
    updated.push_str(&content[position..]);

    Ok(Injection::Inserted {
        content: updated,
        ids: missing.iter().map(|section| section.id.clone()).collect(),
    })
}

/// Apply every plan to its page under `root`; missing pages are skipped, not errors
pub fn apply_plans(root: &Path, plans: &[AnchorPlan], dry_run: bool) -> Result<Vec<FixOutcome>> {
    let root = canonical_root(root)?;
    let mut outcomes = Vec::with_capacity(plans.len());

    for plan in plans {
        let path = root.join(&plan.file);
        let status = if !path.is_file() {
            warn!("Skipping {}: file not found", plan.file);
            FixStatus::MissingFile
        } else {
            match apply_plan(&path, plan, dry_run) {
                Ok(status) => status,
                Err(e) => {
                    warn!("Error processing {}: {}", plan.file, e);
                    FixStatus::Failed(e.to_string())
                }
            }
        };

        debug!("{}: {:?}", plan.file, status);
        outcomes.push(FixOutcome {
            file: plan.file.clone(),
            status,
        });
    }

    info!("Processed {} anchor plans", outcomes.len());
    Ok(outcomes)
}

fn apply_plan(path: &Path, plan: &AnchorPlan, dry_run: bool) -> Result<FixStatus> {
    let content = fs::read_to_string(path)?;

    Ok(match inject_sections(&content, plan)? {
        Injection::Inserted { content, ids } => {
            if !dry_run {
                fs::write(path, content)?;
            }
            FixStatus::Inserted(ids)
        }
        Injection::AlreadyPresent => FixStatus::AlreadyPresent,
        Injection::NoContainer => FixStatus::NoContainer,
    })
}
