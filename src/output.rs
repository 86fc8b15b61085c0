//! CLI output formatting for all pipeline stages.
//!
//! Output is information-centric, not file-centric: the primary display for
//! every post is its title and date, with the filesystem path shown as
//! secondary context via an indented `Source:` line.
//!
//! ## Scan
//!
//! ```text
//! Posts
//! 001 Render Pipeline (2025-03-14)
//!     Source: posts/engine/rendering/Pipeline.md
//!     Summary: How draw calls become pixels.
//!
//! Categories: engine-summary, worklog
//! Tracks: core, rendering
//! Languages: en
//! Tags: gpu (2), memory (1)
//! ```
//!
//! ## Check
//!
//! ```text
//! Links
//! posts/engine/core/Memory.md
//!     Pipeline.md → posts/engine/rendering/Pipeline.md (basename match)
//!     Gone.md → search "Gone"
//!
//! Dead aliases
//!     posts/Old.md → posts/missing/New.md
//!
//! 14 links: 11 direct, 1 alias, 1 recovered by basename, 1 degraded to search
//! ```
//!
//! ## Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::resolve::LinkTarget;
use crate::scan::Manifest;
use crate::types::PostRecord;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn comma_list(values: &[String]) -> String {
    values.join(", ")
}

// ============================================================================
// Scan output
// ============================================================================

pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Posts".to_string());
    for (i, post) in manifest.posts.iter().enumerate() {
        lines.push(format!("{} {} ({})", format_index(i + 1), post.title, post.date));
        lines.push(format!("    Source: {}", post.path));
        if let Some(summary) = &post.summary {
            lines.push(format!("    Summary: {summary}"));
        }
    }

    lines.push(String::new());
    lines.push(format!("Categories: {}", comma_list(&manifest.categories)));
    lines.push(format!("Tracks: {}", comma_list(&manifest.tracks)));
    lines.push(format!("Languages: {}", comma_list(&manifest.languages)));
    let tags: Vec<String> = manifest
        .tags
        .iter()
        .map(|t| format!("{} ({})", t.name, t.count))
        .collect();
    lines.push(format!("Tags: {}", tags.join(", ")));

    lines
}

pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{line}");
    }
}

// ============================================================================
// List output
// ============================================================================

/// One line per post, manifest order: date, title, taxonomy, path.
pub fn format_list_output(posts: &[&PostRecord]) -> Vec<String> {
    if posts.is_empty() {
        return vec!["No posts match the current filters.".to_string()];
    }
    let mut lines: Vec<String> = posts
        .iter()
        .map(|post| {
            format!(
                "{}  {}  [{}/{}]  {}",
                post.date, post.title, post.category, post.track, post.path
            )
        })
        .collect();
    lines.push(format!("{} posts", posts.len()));
    lines
}

pub fn print_list_output(posts: &[&PostRecord]) {
    for line in format_list_output(posts) {
        println!("{line}");
    }
}

// ============================================================================
// Check output
// ============================================================================

/// One resolved link from the collection-wide audit.
pub struct LinkAudit {
    /// Post the link was found in.
    pub source: String,
    /// The href as written.
    pub href: String,
    /// The navigation decision for it.
    pub target: LinkTarget,
}

/// Per-class totals over an audit run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LinkTally {
    pub direct: usize,
    pub recovered: usize,
    pub degraded: usize,
    pub external: usize,
    pub raw: usize,
}

impl LinkTally {
    pub fn total(&self) -> usize {
        self.direct + self.recovered + self.degraded + self.external + self.raw
    }
}

/// Count audits per class. A `Post` decision whose path differs from a plain
/// normalization of the href counts as recovered (alias or basename match) —
/// the distinction the audit surfaces is "would a plain file server have
/// found this", not which heuristic fired.
pub fn tally(audits: &[LinkAudit], recovered: impl Fn(&LinkAudit) -> bool) -> LinkTally {
    let mut tally = LinkTally::default();
    for audit in audits {
        match &audit.target {
            LinkTarget::Post { .. } if recovered(audit) => tally.recovered += 1,
            LinkTarget::Post { .. } => tally.direct += 1,
            LinkTarget::Search { .. } => tally.degraded += 1,
            LinkTarget::External { .. } => tally.external += 1,
            LinkTarget::Raw { .. } => tally.raw += 1,
        }
    }
    tally
}

pub fn format_check_output(
    audits: &[LinkAudit],
    dead_aliases: &[(String, String)],
    recovered: impl Fn(&LinkAudit) -> bool,
) -> Vec<String> {
    let mut lines = Vec::new();

    // Only posts with something worth reporting get a block: recovered
    // links (the content should be fixed eventually) and degraded ones.
    let mut current_source: Option<&str> = None;
    for audit in audits {
        let note = match &audit.target {
            LinkTarget::Post { path, .. } if recovered(audit) => {
                format!("    {} → {} (recovered)", audit.href, path)
            }
            LinkTarget::Search { query, scope } => match scope {
                Some(scope) => format!("    {} → search \"{query}\" in {scope}", audit.href),
                None => format!("    {} → search \"{query}\"", audit.href),
            },
            _ => continue,
        };
        if current_source != Some(audit.source.as_str()) {
            if lines.is_empty() {
                lines.push("Links".to_string());
            }
            lines.push(audit.source.clone());
            current_source = Some(audit.source.as_str());
        }
        lines.push(note);
    }

    if !dead_aliases.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Dead aliases".to_string());
        for (from, to) in dead_aliases {
            lines.push(format!("    {from} → {to}"));
        }
    }

    let t = tally(audits, recovered);
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{} links: {} direct, {} recovered, {} degraded to search, {} external, {} untouched",
        t.total(),
        t.direct,
        t.recovered,
        t.degraded,
        t.external,
        t.raw,
    ));

    lines
}

pub fn print_check_output(
    audits: &[LinkAudit],
    dead_aliases: &[(String, String)],
    recovered: impl Fn(&LinkAudit) -> bool,
) {
    for line in format_check_output(audits, dead_aliases, recovered) {
        println!("{line}");
    }
}

// ============================================================================
// Generate output
// ============================================================================

pub fn format_generate_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = vec!["Home → index.html".to_string()];
    for (i, post) in manifest.posts.iter().enumerate() {
        lines.push(format!(
            "{} {} → {}.html",
            format_index(i + 1),
            post.title,
            post.path.trim_end_matches(".md"),
        ));
    }
    lines.push(format!("Generated {} post pages", manifest.posts.len()));
    lines
}

pub fn print_generate_output(manifest: &Manifest) {
    for line in format_generate_output(manifest) {
        println!("{line}");
    }
}
