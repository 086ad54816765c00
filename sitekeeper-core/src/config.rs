use crate::anchors::AnchorPlan;
use crate::error::{Result, SiteError};
use crate::relink::LinkMap;
use crate::style::StyleRules;
use crate::validate::Journey;
use serde::{Deserialize, Serialize};
use sitekeeper_scanner::DEFAULT_SKIP_DIRS;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File looked up in the site root when no config path is given
pub const CONFIG_FILE_NAME: &str = "sitekeeper.toml";

/// Configuration used when the site has no config file; `sitekeeper init` writes it out
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub links: LinksSection,
    pub style: StyleRules,
    pub journeys: Vec<Journey>,
    pub relink: RelinkSection,
    pub anchors: Vec<AnchorPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Explicit page list; every page under the root is checked when absent
    pub pages: Option<Vec<String>>,
    pub skip_dirs: Vec<String>,
    pub report_file: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            pages: None,
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|d| d.to_string()).collect(),
            report_file: "validation-report.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksSection {
    pub check_anchors: bool,
}

impl Default for LinksSection {
    fn default() -> Self {
        Self {
            check_anchors: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelinkSection {
    pub mappings: LinkMap,
}

impl SiteConfig {
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// The embedded default configuration
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(DEFAULT_CONFIG).map_err(|source| SiteError::ConfigParse {
            path: PathBuf::from("<builtin>"),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|source| SiteError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Explicit path first, then `sitekeeper.toml` in the site root, then the built-in defaults
    pub fn load_for_root(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, root.display());
            Self::builtin()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.site.report_file.trim().is_empty() {
            return Err(SiteError::InvalidConfig(
                "site.report_file must not be empty".to_string(),
            ));
        }

        for (old, new) in &self.relink.mappings {
            if old.trim().is_empty() || new.trim().is_empty() {
                return Err(SiteError::InvalidConfig(format!(
                    "relink mapping '{}' -> '{}' has an empty side",
                    old, new
                )));
            }
        }

        for plan in &self.anchors {
            if !is_heading_tag(&plan.heading_tag) {
                return Err(SiteError::InvalidConfig(format!(
                    "anchors for {}: heading_tag '{}' is not h1-h6",
                    plan.file, plan.heading_tag
                )));
            }
            for section in &plan.sections {
                if section.id.is_empty()
                    || section.id.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'')
                {
                    return Err(SiteError::InvalidConfig(format!(
                        "anchors for {}: invalid section id '{}'",
                        plan.file, section.id
                    )));
                }
            }
        }

        Ok(())
    }
}

fn is_heading_tag(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}
