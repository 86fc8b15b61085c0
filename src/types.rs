//! Shared types used across both pipeline stages.
//!
//! These types are serialized to JSON between stages (scan → generate)
//! and must be identical across both modules.

use serde::{Deserialize, Serialize};

/// One post in the collection, built from a markdown file's frontmatter.
///
/// `path` is the repo-relative, slash-separated location of the source file
/// (e.g. `posts/engine/rendering/Deep-Dive.md`). It is the unique key for the
/// post and is never mutated after the scan stage writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    /// Canonical slash-separated source path, unique across the manifest
    pub path: String,
    /// Title from frontmatter, or the file stem when absent
    pub title: String,
    /// ISO date string from frontmatter, empty when absent
    #[serde(default)]
    pub date: String,
    /// Coarse grouping (e.g. `worklog`, `engine-summary`)
    #[serde(default = "default_category")]
    pub category: String,
    /// Sub-grouping within a category
    #[serde(default = "default_track")]
    pub track: String,
    /// Editorial status (`wip`, `stable`, ...)
    #[serde(default = "default_status")]
    pub status: String,
    /// Associated project name, empty when absent
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,
    /// Frontmatter tags, order preserved for display
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// First body line that is neither a heading nor a table row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Content language; defaulted at load time, never empty afterwards
    #[serde(default = "default_language")]
    pub lang: String,
}

/// Tag usage count, manifest-wide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCount {
    pub name: String,
    pub count: u32,
}

pub(crate) fn default_category() -> String {
    "other".to_string()
}

pub(crate) fn default_track() -> String {
    "other".to_string()
}

pub(crate) fn default_status() -> String {
    "wip".to_string()
}

pub(crate) fn default_language() -> String {
    "en".to_string()
}

impl PostRecord {
    /// Minimal record for a path — title from the stem, everything else
    /// defaulted. Scan fills in real frontmatter values on top of this.
    pub fn stub(path: &str) -> Self {
        let stem = path
            .rsplit('/')
            .next()
            .unwrap_or(path)
            .trim_end_matches(".md");
        PostRecord {
            path: path.to_string(),
            title: stem.to_string(),
            date: String::new(),
            category: default_category(),
            track: default_track(),
            status: default_status(),
            project: String::new(),
            tags: Vec::new(),
            summary: None,
            lang: default_language(),
        }
    }

    /// Final path segment (filename with extension).
    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_title_is_file_stem() {
        let p = PostRecord::stub("posts/engine/Deep-Dive.md");
        assert_eq!(p.title, "Deep-Dive");
        assert_eq!(p.category, "other");
        assert_eq!(p.lang, "en");
    }

    #[test]
    fn basename_is_final_segment() {
        let p = PostRecord::stub("posts/a/b/x.md");
        assert_eq!(p.basename(), "x.md");
    }

    #[test]
    fn basename_of_bare_filename() {
        let p = PostRecord::stub("x.md");
        assert_eq!(p.basename(), "x.md");
    }

    #[test]
    fn deserialization_applies_defaults() {
        let json = r#"{"path": "posts/a.md", "title": "A"}"#;
        let p: PostRecord = serde_json::from_str(json).unwrap();
        assert_eq!(p.status, "wip");
        assert_eq!(p.category, "other");
        assert_eq!(p.track, "other");
        assert_eq!(p.lang, "en");
        assert!(p.tags.is_empty());
        assert!(p.summary.is_none());
    }
}
