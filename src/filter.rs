//! Filter and search evaluation over the post index.
//!
//! Turns the current filter state — category, track, tag, section scope,
//! free text, language — into the visible subset of posts. Filters are
//! independent predicates ANDed together, so the order they were set in is
//! irrelevant; evaluation preserves manifest order and leaves any
//! view-specific sorting (e.g. path-lexicographic directory listings) to
//! the caller.
//!
//! Text matching is a case-insensitive substring scan over the record's
//! display fields. It is deliberately not a search engine: no tokenization,
//! no ranking, no index.

use crate::index::PostIndex;
use crate::types::PostRecord;

/// Category selection. `Any` is the explicit "all categories" chip — it
/// admits every post but is a distinct state from no category filter at
/// all, which matters to UI code mirroring the state into a URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    Any,
    Is(String),
}

/// One render pass's filter state. Immutable while evaluating; a changed
/// filter means a fresh value and a fresh pass.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// `None` = no category filter set; `Some(Any)` = explicit "all".
    pub category: Option<CategoryFilter>,
    pub track: Option<String>,
    pub tag: Option<String>,
    /// Directory scope, relative to the section root (`"engine/rendering"`).
    pub section: Option<String>,
    /// Free-text query; blank strings are ignored.
    pub query: Option<String>,
    pub lang: Option<String>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        matches!(self.category, None | Some(CategoryFilter::Any))
            && self.track.is_none()
            && self.tag.is_none()
            && self.section.is_none()
            && self.lang.is_none()
            && !self.has_query()
    }

    fn has_query(&self) -> bool {
        self.query.as_deref().is_some_and(|q| !q.trim().is_empty())
    }
}

/// Evaluate `filters` against the whole index, preserving manifest order.
pub fn evaluate<'a>(
    index: &'a PostIndex,
    filters: &Filters,
    section_root: &str,
) -> Vec<&'a PostRecord> {
    index
        .posts()
        .iter()
        .filter(|post| matches(post, filters, section_root))
        .collect()
}

/// Whether one post passes every active filter.
pub fn matches(post: &PostRecord, filters: &Filters, section_root: &str) -> bool {
    if let Some(CategoryFilter::Is(category)) = &filters.category
        && post.category != *category
    {
        return false;
    }
    if let Some(track) = &filters.track
        && post.track != *track
    {
        return false;
    }
    if let Some(tag) = &filters.tag
        && !post.tags.iter().any(|t| t == tag)
    {
        return false;
    }
    if let Some(lang) = &filters.lang
        && post.lang != *lang
    {
        return false;
    }
    if let Some(section) = &filters.section
        && !in_section(post, section, section_root)
    {
        return false;
    }
    if let Some(query) = &filters.query {
        let needle = query.trim().to_lowercase();
        if !needle.is_empty() && !text_matches(post, &needle) {
            return false;
        }
    }
    true
}

/// Section scoping: the post's root-stripped path must sit strictly below
/// the section directory (`prefix + "/"`).
fn in_section(post: &PostRecord, section: &str, section_root: &str) -> bool {
    let Some(rel) = post.path.strip_prefix(section_root) else {
        return false;
    };
    rel.starts_with(&format!("{section}/"))
}

/// Case-insensitive substring scan over the post's display fields.
fn text_matches(post: &PostRecord, needle: &str) -> bool {
    let haystack = format!(
        "{} {} {} {} {} {}",
        post.title,
        post.summary.as_deref().unwrap_or(""),
        post.category,
        post.track,
        post.path,
        post.tags.join(" "),
    )
    .to_lowercase();
    haystack.contains(needle)
}
