//! Link resolution: raw markdown hrefs → navigation decisions.
//!
//! Posts link to each other with relative references written against a tree
//! that keeps moving — files get renamed, folders reshuffled, whole tracks
//! re-imported. Instead of emitting whatever the author typed and hoping,
//! every in-document link is resolved against the index at render time and
//! degrades through a fallback chain before it is allowed to die:
//!
//! ```text
//! direct path hit  →  curated alias  →  unique basename  →  search page
//! ```
//!
//! Each step only runs when the previous one missed, so a live path is never
//! second-guessed by an alias, and an alias is never second-guessed by the
//! basename heuristic. The chain is total: every `(source, href)` pair maps
//! to exactly one [`LinkTarget`], and the resolver never errors and never
//! touches the index's contents.
//!
//! The alias table and the generic-basename deny-list come from
//! `config.toml` — they are corpus-specific data (see [`crate::config`]),
//! not resolver logic.

use crate::backnav::has_scheme;
use crate::config::SiteConfig;
use crate::index::PostIndex;
use crate::normalize::resolve_relative;
use std::collections::BTreeMap;
use std::collections::HashSet;

/// The decision for one raw link reference. Exactly one variant per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// A live post in the index, with an optional in-page fragment.
    Post {
        path: String,
        fragment: Option<String>,
    },
    /// A link leaving the document tree. `new_tab` is set for http(s) and
    /// protocol-relative URLs; mailto/tel and friends render in place.
    External { url: String, new_tab: bool },
    /// No live target found: degrade to the search page instead of a dead
    /// link. `scope` narrows the search to the source's top-level section
    /// when one is derivable.
    Search { query: String, scope: Option<String> },
    /// Left untouched: in-page anchors, same-directory assets, empty hrefs.
    Raw { href: String },
}

/// Resolves one post's link references against the immutable index.
pub struct LinkResolver<'a> {
    index: &'a PostIndex,
    aliases: &'a BTreeMap<String, String>,
    generic_basenames: HashSet<&'a str>,
    section_root: &'a str,
}

impl<'a> LinkResolver<'a> {
    pub fn new(index: &'a PostIndex, config: &'a SiteConfig) -> Self {
        LinkResolver {
            index,
            aliases: &config.aliases,
            generic_basenames: config.generic_basenames.iter().map(String::as_str).collect(),
            section_root: &config.section_root,
        }
    }

    /// Classify `href` as found in the body of the post at `source_path`.
    ///
    /// First match wins:
    ///
    /// 1. empty → [`LinkTarget::Raw`] (the renderer drops the anchor)
    /// 2. scheme-qualified or `//…` → [`LinkTarget::External`]
    /// 3. bare `#fragment` → [`LinkTarget::Raw`]
    /// 4. no `.md` extension → [`LinkTarget::Raw`] (static asset)
    /// 5. otherwise normalize and walk the fallback chain
    pub fn resolve(&self, source_path: &str, href: &str) -> LinkTarget {
        if href.is_empty() {
            return LinkTarget::Raw {
                href: String::new(),
            };
        }
        if has_scheme(href) || href.starts_with("//") {
            let new_tab = href.starts_with("http://")
                || href.starts_with("https://")
                || href.starts_with("//");
            return LinkTarget::External {
                url: href.to_string(),
                new_tab,
            };
        }
        if href.starts_with('#') {
            return LinkTarget::Raw {
                href: href.to_string(),
            };
        }

        let (path_part, fragment) = split_fragment(href);
        if !is_content_path(path_part) {
            return LinkTarget::Raw {
                href: href.to_string(),
            };
        }

        let resolved = resolve_relative(source_path, path_part);

        if self.index.contains(&resolved) {
            return LinkTarget::Post {
                path: resolved,
                fragment,
            };
        }

        if let Some(target) = self.aliases.get(&resolved)
            && self.index.contains(target)
        {
            return LinkTarget::Post {
                path: target.clone(),
                fragment,
            };
        }

        let basename = resolved.rsplit('/').next().unwrap_or(&resolved);
        let candidates = self.index.by_basename(basename);
        if candidates.len() == 1 && !self.generic_basenames.contains(basename) {
            return LinkTarget::Post {
                path: candidates[0].clone(),
                fragment,
            };
        }

        LinkTarget::Search {
            query: basename.trim_end_matches(".md").to_string(),
            scope: self.section_scope(source_path),
        }
    }

    /// The source's top-level section under the configured root, as a full
    /// path prefix (`posts/engine/x.md` with root `posts/` → `posts/engine`).
    /// `None` when the source sits outside the root or directly under it.
    fn section_scope(&self, source_path: &str) -> Option<String> {
        let rel = source_path.strip_prefix(self.section_root)?;
        let (first, rest) = rel.split_once('/')?;
        if first.is_empty() || rest.is_empty() {
            return None;
        }
        Some(format!("{}{}", self.section_root, first))
    }
}

/// Split an href into `(path, fragment)` on the first `#`. An empty
/// fragment (`"a.md#"`) counts as no fragment.
fn split_fragment(href: &str) -> (&str, Option<String>) {
    match href.split_once('#') {
        Some((path, frag)) if !frag.is_empty() => (path, Some(frag.to_string())),
        Some((path, _)) => (path, None),
        None => (href, None),
    }
}

/// Whether a path names a content document (by extension, case-insensitive).
fn is_content_path(path: &str) -> bool {
    path.rsplit('.')
        .next()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
        && path.len() > ".md".len()
}
