//! Content scanning and manifest generation.
//!
//! Stage 1 of the waypost build pipeline. Walks the configured post
//! directories, parses each markdown file's frontmatter, and produces the
//! manifest the generate stage (and the `check`/`list` commands) consume.
//!
//! ## Content Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! └── posts/                       # Scanned for *.md, recursively
//!     ├── Meta.md
//!     ├── engine/
//!     │   ├── Overview.md
//!     │   └── rendering/
//!     │       └── Pipeline.md
//!     └── worklog/
//!         └── 2025/
//!             └── January.md
//! ```
//!
//! ## Record Extraction
//!
//! Every field a post doesn't declare gets a defined value at scan time, so
//! downstream code never re-derives defaults per access:
//!
//! - `title`: frontmatter → file stem
//! - `lang`: frontmatter → configured default
//! - `category`/`track`: frontmatter → `"other"`; `status`: → `"wip"`
//! - `summary`: first body line that is neither heading nor table row
//!
//! ## Validation
//!
//! The post path is the manifest's unique key. A duplicate (possible when
//! `posts_dirs` overlap) is a load-time defect that fails the scan rather
//! than silently corrupting the derived indexes.

use crate::config::{self, ConfigError, SiteConfig};
use crate::frontmatter;
use crate::index::{IndexError, PostIndex};
use crate::types::{PostRecord, TagCount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    /// All posts, sorted by `(date, title)` descending.
    pub posts: Vec<PostRecord>,
    /// Distinct languages, sorted.
    pub languages: Vec<String>,
    /// Distinct categories, sorted.
    pub categories: Vec<String>,
    /// Distinct tracks, sorted.
    pub tracks: Vec<String>,
    /// Tag usage counts, count-descending then name.
    pub tags: Vec<TagCount>,
    pub config: SiteConfig,
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;

    let mut posts = Vec::new();
    for dir in &config.posts_dirs {
        let posts_dir = root.join(dir);
        if !posts_dir.exists() {
            continue;
        }
        collect_posts(&posts_dir, root, &config, &mut posts)?;
    }

    // Newest first, title as tiebreaker — the manifest order is the site's
    // default listing order.
    posts.sort_by(|a, b| (&b.date, &b.title).cmp(&(&a.date, &a.title)));

    // Duplicate-path validation goes through the same index the rest of the
    // system uses, so scan and render agree on what a defect is.
    let index = PostIndex::build(posts)?;
    let posts = index.into_posts();

    let languages = distinct(posts.iter().map(|p| p.lang.clone()));
    let categories = distinct(posts.iter().map(|p| p.category.clone()));
    let tracks = distinct(posts.iter().map(|p| p.track.clone()));
    let tags = count_tags(&posts);

    Ok(Manifest {
        posts,
        languages,
        categories,
        tracks,
        tags,
        config,
    })
}

fn collect_posts(
    posts_dir: &Path,
    root: &Path,
    config: &SiteConfig,
    posts: &mut Vec<PostRecord>,
) -> Result<(), ScanError> {
    for entry in WalkDir::new(posts_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");

        let text = fs::read_to_string(entry.path())?;
        posts.push(build_record(rel, &text, config));
    }
    Ok(())
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

/// Turn one markdown file into a fully-defaulted record.
fn build_record(path: String, text: &str, config: &SiteConfig) -> PostRecord {
    let (fields, body) = frontmatter::parse(text);

    let text_field = |key: &str| -> Option<String> {
        fields
            .get(key)
            .and_then(|v| v.as_text())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    let mut record = PostRecord::stub(&path);
    if let Some(title) = text_field("title") {
        record.title = title;
    }
    if let Some(date) = text_field("date") {
        record.date = date;
    }
    if let Some(category) = text_field("category") {
        record.category = category;
    }
    if let Some(track) = text_field("track") {
        record.track = track;
    }
    if let Some(status) = text_field("status") {
        record.status = status;
    }
    if let Some(project) = text_field("project") {
        record.project = project;
    }
    record.lang = text_field("lang").unwrap_or_else(|| config.default_lang.clone());
    record.tags = fields
        .get("tags")
        .map(|v| v.to_list())
        .unwrap_or_default();
    record.summary = frontmatter::extract_summary(body);
    record
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    values.collect::<BTreeSet<_>>().into_iter().collect()
}

fn count_tags(posts: &[PostRecord]) -> Vec<TagCount> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag).or_default() += 1;
        }
    }
    let mut tags: Vec<TagCount> = counts
        .into_iter()
        .map(|(name, count)| TagCount {
            name: name.to_string(),
            count,
        })
        .collect();
    tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    tags
}
