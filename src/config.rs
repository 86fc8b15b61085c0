//! Site configuration module.
//!
//! Handles loading and validating `config.toml` from the content root.
//! Configuration is sparse: stock defaults are overridden by whatever keys
//! the user's file provides, and unknown keys are rejected to catch typos
//! early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_title = "Waypost"
//!
//! # Directories scanned for *.md posts, relative to the content root
//! posts_dirs = ["posts"]
//!
//! # Prefix stripped from post paths when building the browse tree and
//! # section scopes ("posts/engine/x.md" browses as "engine/x.md")
//! section_root = "posts/"
//!
//! # Language assumed for posts whose frontmatter has no `lang`
//! default_lang = "en"
//!
//! # Default target for neutralized or empty back-navigation tokens
//! landing_page = "index.html"
//!
//! # Top-level page names honored in back-navigation tokens
//! allowed_pages = ["index.html", "browse"]
//!
//! # Basenames too generic for the unique-basename link fallback. These
//! # names recur across unrelated sections, so a "unique" match is noise.
//! generic_basenames = ["Overview.md", "README.md", "index.md"]
//!
//! # Known moved/renamed documents: broken resolved path -> live path
//! [aliases]
//! "posts/engine/Old-Name.md" = "posts/engine/rendering/New-Name.md"
//! ```
//!
//! The alias table and the generic-basename list are data, not logic: both
//! are heuristics tuned to one collection's naming patterns and grow with
//! the corpus, never with the resolver's code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Title shown in page headers and `<title>`.
    pub site_title: String,
    /// Directories scanned for posts, relative to the content root.
    pub posts_dirs: Vec<String>,
    /// Prefix stripped from post paths for section browsing.
    pub section_root: String,
    /// Language assigned to posts without a frontmatter `lang`.
    pub default_lang: String,
    /// Default back-navigation target.
    pub landing_page: String,
    /// Top-level page names honored in back-navigation tokens.
    pub allowed_pages: Vec<String>,
    /// Basenames excluded from the unique-basename link fallback.
    pub generic_basenames: Vec<String>,
    /// Curated moved-document table: broken resolved path → live path.
    pub aliases: BTreeMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            site_title: "Waypost".to_string(),
            posts_dirs: vec!["posts".to_string()],
            section_root: "posts/".to_string(),
            default_lang: "en".to_string(),
            landing_page: "index.html".to_string(),
            allowed_pages: vec!["index.html".to_string(), "browse".to_string()],
            generic_basenames: vec![
                "Overview.md".to_string(),
                "README.md".to_string(),
                "index.md".to_string(),
            ],
            aliases: BTreeMap::new(),
        }
    }
}

impl SiteConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.landing_page.is_empty() {
            return Err(ConfigError::Validation(
                "landing_page must not be empty".to_string(),
            ));
        }
        if self.posts_dirs.is_empty() {
            return Err(ConfigError::Validation(
                "posts_dirs must list at least one directory".to_string(),
            ));
        }
        for (from, to) in &self.aliases {
            if from.is_empty() || to.is_empty() {
                return Err(ConfigError::Validation(
                    "alias entries must map a non-empty path to a non-empty path".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Normalize loaded values: the section root comparison logic assumes a
    /// trailing slash, so enforce one here instead of at every call site.
    fn normalize(mut self) -> Self {
        if !self.section_root.is_empty() && !self.section_root.ends_with('/') {
            self.section_root.push('/');
        }
        self
    }
}

/// Load `config.toml` from the content root, or stock defaults when the
/// file doesn't exist.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = root.join("config.toml");
    if !path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: SiteConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config.normalize())
}

/// The stock `config.toml`, fully documented, for `waypost gen-config`.
pub fn stock_config_toml() -> String {
    let defaults = SiteConfig::default();
    format!(
        r#"# waypost site configuration
# All options are optional - the values below are the stock defaults.

site_title = "{site_title}"

# Directories scanned for *.md posts, relative to the content root.
posts_dirs = ["posts"]

# Prefix stripped from post paths when building the browse tree and
# section scopes.
section_root = "{section_root}"

# Language assumed for posts whose frontmatter has no `lang`.
default_lang = "{default_lang}"

# Default target for neutralized or empty back-navigation tokens.
landing_page = "{landing_page}"

# Top-level page names honored in back-navigation tokens.
allowed_pages = ["index.html", "browse"]

# Basenames too generic for the unique-basename link fallback.
generic_basenames = ["Overview.md", "README.md", "index.md"]

# Known moved/renamed documents: broken resolved path -> live path.
# Grow this table as documents move; the resolver falls through to its
# next heuristic when a target here is itself dead.
[aliases]
# "posts/engine/Old-Name.md" = "posts/engine/rendering/New-Name.md"
"#,
        site_title = defaults.site_title,
        section_root = defaults.section_root,
        default_lang = defaults.default_lang,
        landing_page = defaults.landing_page,
    )
}
