//! HTML site generation.
//!
//! Stage 2 of the waypost build pipeline. Takes the scan manifest and the
//! content root and generates the final static site.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): full post listing with metadata cards
//! - **Browse pages** (`/browse/{dir}/index.html`): section tree sidebar
//!   with descendant counts plus the directory's post listing
//! - **Post pages** (`/posts/{...}.html`): rendered markdown body with every
//!   link rewritten through the resolver's fallback chain
//!
//! ## Link Rewriting
//!
//! The markdown renderer never sees raw hrefs. Each link event is passed
//! through [`LinkResolver::resolve`] — a pure function over the event
//! stream, not a hook installed on shared parser state — and the anchor is
//! emitted from the decision: internal links point at the generated post
//! page (fragment re-attached, percent-encoded), external http(s) links get
//! `target="_blank" rel="noopener"`, unresolvable references degrade to the
//! browse page with a prefilled search query. A dead `<a>` is never
//! emitted.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping; the one
//! spot receiving pre-built HTML (the rewritten post body) goes through
//! `PreEscaped` after pulldown-cmark's own escaping.

use crate::backnav::safe_return_href;
use crate::config::SiteConfig;
use crate::filter::{self, Filters};
use crate::frontmatter;
use crate::index::{IndexError, PostIndex};
use crate::resolve::{LinkResolver, LinkTarget};
use crate::scan::Manifest;
use crate::tree::SectionNode;
use crate::types::PostRecord;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use pulldown_cmark::{Event, Parser, Tag, TagEnd, html as md_html};
use pulldown_cmark_escape::escape_html;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

const CSS: &str = include_str!("../static/style.css");

/// Characters beyond `CONTROLS` that must be escaped inside a fragment.
const FRAGMENT_ENC: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');
/// Query values additionally escape the separators that would split them.
const QUERY_ENC: &AsciiSet = &FRAGMENT_ENC.add(b'#').add(b'&').add(b'+').add(b'=');

pub fn generate(
    manifest_path: &Path,
    content_root: &Path,
    output_dir: &Path,
) -> Result<(), GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    let config = manifest.config.clone();

    let index = PostIndex::build(manifest.posts)?;
    let resolver = LinkResolver::new(&index, &config);

    fs::create_dir_all(output_dir)?;

    // Index page
    let index_html = render_index(&index, &config);
    fs::write(output_dir.join("index.html"), index_html.into_string())?;
    println!("Generated index.html");

    // Browse pages, one per tree node plus the root
    let tree = SectionNode::build(index.posts().iter(), &config.section_root);
    let mut browse_pages = 0usize;
    for node in tree.nodes() {
        let page = render_browse_page(&tree, node, &index, &config);
        let dir = if node.path.is_empty() {
            output_dir.join("browse")
        } else {
            output_dir.join("browse").join(&node.path)
        };
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("index.html"), page.into_string())?;
        browse_pages += 1;
    }
    println!("Generated {browse_pages} browse pages");

    // Post pages, rendered in parallel — each pass only reads the shared
    // index, so the passes are independent by construction.
    index
        .posts()
        .par_iter()
        .try_for_each(|post| render_post_to_disk(post, &resolver, &config, content_root, output_dir))?;
    println!("Generated {} post pages", index.len());

    println!("Site generated at {}", output_dir.display());
    Ok(())
}

fn render_post_to_disk(
    post: &PostRecord,
    resolver: &LinkResolver<'_>,
    config: &SiteConfig,
    content_root: &Path,
    output_dir: &Path,
) -> Result<(), GenerateError> {
    let text = fs::read_to_string(content_root.join(&post.path))?;
    let body = frontmatter::strip(&text);
    let page = render_post_page(post, body, resolver, config);

    let out_path = output_dir.join(html_output_path(&post.path));
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(out_path, page.into_string())?;
    Ok(())
}

/// Output location for a post: source path with the extension swapped
/// (`posts/a/x.md` → `posts/a/x.html`).
fn html_output_path(post_path: &str) -> String {
    format!("{}.html", post_path.trim_end_matches(".md"))
}

// ============================================================================
// Hrefs
// ============================================================================

/// Site-root-absolute href for a post page, fragment re-attached.
pub fn post_href(path: &str, fragment: Option<&str>) -> String {
    let mut href = String::from("/");
    href.push_str(&encode_path(&html_output_path(path)));
    if let Some(frag) = fragment {
        href.push('#');
        href.push_str(&utf8_percent_encode(frag, FRAGMENT_ENC).to_string());
    }
    href
}

/// Href for a browse page (`""` → the browse root).
pub fn browse_href(dir: &str) -> String {
    if dir.is_empty() {
        "/browse/index.html".to_string()
    } else {
        format!("/browse/{}/index.html", encode_path(dir))
    }
}

/// Search fallback href: the browse root with a prefilled query, scoped to
/// the source's section when one was derivable.
pub fn search_href(query: &str, scope: Option<&str>) -> String {
    let mut href = format!(
        "/browse/index.html?q={}",
        utf8_percent_encode(query, QUERY_ENC)
    );
    if let Some(scope) = scope {
        href.push_str("&scope=");
        href.push_str(&utf8_percent_encode(scope, QUERY_ENC).to_string());
    }
    href
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|seg| utf8_percent_encode(seg, QUERY_ENC).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// The emitted href and new-tab flag for one navigation decision.
pub fn href_for(target: &LinkTarget) -> (String, bool) {
    match target {
        LinkTarget::Post { path, fragment } => (post_href(path, fragment.as_deref()), false),
        LinkTarget::External { url, new_tab } => (url.clone(), *new_tab),
        LinkTarget::Search { query, scope } => (search_href(query, scope.as_deref()), false),
        LinkTarget::Raw { href } => (href.clone(), false),
    }
}

// ============================================================================
// Link rewriting
// ============================================================================

/// Rewrite every link event in a post body through the resolver.
///
/// Link tags are replaced with raw anchor HTML built from the navigation
/// decision; all other events pass through untouched. An empty href drops
/// the anchor entirely, keeping the display text.
pub fn rewrite_links<'a>(
    events: impl Iterator<Item = Event<'a>>,
    resolver: &LinkResolver<'_>,
    source_path: &str,
) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    // Markdown links don't nest, so one flag is enough to pair the
    // dropped Start with its End.
    let mut dropped_anchor = false;

    for event in events {
        match event {
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) => {
                let target = resolver.resolve(source_path, &dest_url);
                if matches!(&target, LinkTarget::Raw { href } if href.is_empty()) {
                    dropped_anchor = true;
                    continue;
                }
                let (href, new_tab) = href_for(&target);
                out.push(Event::Html(anchor_open(&href, &title, new_tab).into()));
            }
            Event::End(TagEnd::Link) => {
                if dropped_anchor {
                    dropped_anchor = false;
                } else {
                    out.push(Event::Html("</a>".into()));
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn anchor_open(href: &str, title: &str, new_tab: bool) -> String {
    let mut a = String::from("<a href=\"");
    escape_html(&mut a, href).ok();
    a.push('"');
    if !title.is_empty() {
        a.push_str(" title=\"");
        escape_html(&mut a, title).ok();
        a.push('"');
    }
    if new_tab {
        a.push_str(" target=\"_blank\" rel=\"noopener\"");
    }
    a.push('>');
    a
}

/// Every link href found in a markdown body, document order. Used by the
/// `check` command to audit the whole collection's link health.
pub fn extract_links(markdown: &str) -> Vec<String> {
    Parser::new(markdown)
        .filter_map(|event| match event {
            Event::Start(Tag::Link { dest_url, .. }) => Some(dest_url.to_string()),
            _ => None,
        })
        .collect()
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header with title and top-level navigation
fn site_header(config: &SiteConfig) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/index.html" { (config.site_title) }
            nav.site-nav {
                a href="/index.html" { "Posts" }
                a href="/browse/index.html" { "Browse" }
            }
        }
    }
}

/// One post card: title link, metadata sub-line, tags, summary.
fn post_card(post: &PostRecord) -> Markup {
    html! {
        article.post {
            h3 { a href=(post_href(&post.path, None)) { (post.title) } }
            div.sub {
                (post.date) " | " (post.category) " | " (post.track) " | " (post.status)
            }
            @if let Some(summary) = &post.summary {
                p { (summary) }
            } @else {
                p.muted { "No summary" }
            }
            @if !post.tags.is_empty() {
                div.tags {
                    @for tag in &post.tags {
                        span.tag { (tag) }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the index page: every post, manifest order.
fn render_index(index: &PostIndex, config: &SiteConfig) -> Markup {
    let content = html! {
        (site_header(config))
        main.index-page {
            p.meta { (index.len()) " posts" }
            div.post-list {
                @for post in index.posts() {
                    (post_card(post))
                }
            }
        }
    };
    base_document(&config.site_title, content)
}

/// Renders one browse page: the tree sidebar plus the selected directory's
/// listing, path-sorted.
fn render_browse_page(
    tree: &SectionNode<'_>,
    selected: &SectionNode<'_>,
    index: &PostIndex,
    config: &SiteConfig,
) -> Markup {
    let listing = browse_listing(index, &selected.path, config);
    let title = if selected.path.is_empty() {
        "Browse".to_string()
    } else {
        selected.path.clone()
    };

    let content = html! {
        (site_header(config))
        main.browse-page {
            aside.tree {
                a.tree-root href=(browse_href("")) { "All" }
                @for child in tree.sorted_children() {
                    (render_tree_folder(child, &selected.path))
                }
            }
            section.listing {
                h2 { (title) }
                p.meta { (listing.len()) " docs" }
                @if listing.is_empty() {
                    p.empty { "No documents for current selection." }
                }
                @for post in &listing {
                    (post_card(post))
                }
            }
        }
    };
    base_document(&format!("{} — {}", title, config.site_title), content)
}

/// The selected directory's posts: its whole subtree for a directory node,
/// everything under the section root for the browse root. Path order.
fn browse_listing<'a>(
    index: &'a PostIndex,
    selected: &str,
    config: &SiteConfig,
) -> Vec<&'a PostRecord> {
    let filters = Filters {
        section: (!selected.is_empty()).then(|| selected.to_string()),
        ..Filters::default()
    };
    let mut listing: Vec<&PostRecord> = filter::evaluate(index, &filters, &config.section_root)
        .into_iter()
        .filter(|p| p.path.starts_with(&config.section_root))
        .collect();
    listing.sort_by(|a, b| a.path.cmp(&b.path));
    listing
}

/// One collapsible folder in the tree sidebar, expanded along the path to
/// the selected directory.
fn render_tree_folder(node: &SectionNode<'_>, selected: &str) -> Markup {
    let current = node.path == selected;
    html! {
        details.tree-folder open[node.default_open(selected)] {
            summary.tree-summary {
                a.tree-folder-link.active[current] href=(browse_href(&node.path)) { (node.name) }
                span.tree-count { (node.descendant_count) }
            }
            div.tree-children {
                @for child in node.sorted_children() {
                    (render_tree_folder(child, selected))
                }
            }
        }
    }
}

/// Renders a post page: metadata header, rewritten markdown body, and a
/// validated back link.
pub fn render_post_page(
    post: &PostRecord,
    body: &str,
    resolver: &LinkResolver<'_>,
    config: &SiteConfig,
) -> Markup {
    let events = rewrite_links(Parser::new(body), resolver, &post.path);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, events.into_iter());

    let content = html! {
        (site_header(config))
        main.post-page {
            header.post-header {
                h1 { (post.title) }
                div.sub {
                    (post.date) " | " (post.category) " | " (post.track) " | " (post.status)
                }
                @if !post.tags.is_empty() {
                    div.tags {
                        @for tag in &post.tags {
                            span.tag { (tag) }
                        }
                    }
                }
            }
            article.markdown {
                (PreEscaped(body_html))
            }
            nav.post-footer {
                a.back-link href=(back_href(post, config)) { "← Back" }
            }
        }
    };
    base_document(&post.title, content)
}

/// Back link for a post: its section's browse page, passed through the
/// back-navigation validator and rooted at the site root (post pages live
/// deep in the tree, so a `./` relative target would not land).
fn back_href(post: &PostRecord, config: &SiteConfig) -> String {
    let token = post
        .path
        .strip_prefix(&config.section_root)
        .and_then(|rel| rel.rsplit_once('/'))
        .map(|(dir, _)| format!("browse/{dir}/index.html"))
        .unwrap_or_else(|| "browse/index.html".to_string());
    let safe = safe_return_href(&token, &config.landing_page, &config.allowed_pages);
    format!("/{}", safe.trim_start_matches("./"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (PostIndex, SiteConfig) {
        let mut config = SiteConfig::default();
        config.section_root = "posts/".to_string();
        let index = PostIndex::build(vec![
            PostRecord::stub("posts/engine/rendering/Pipeline.md"),
            PostRecord::stub("posts/engine/rendering/Shaders.md"),
            PostRecord::stub("posts/engine/core/Memory.md"),
            PostRecord::stub("posts/worklog/January.md"),
        ])
        .unwrap();
        (index, config)
    }

    fn render(markdown: &str, source: &str) -> String {
        let (index, config) = setup();
        let resolver = LinkResolver::new(&index, &config);
        let events = rewrite_links(Parser::new(markdown), &resolver, source);
        let mut out = String::new();
        md_html::push_html(&mut out, events.into_iter());
        out
    }

    #[test]
    fn internal_link_points_at_generated_page() {
        let html = render(
            "See [shaders](Shaders.md).",
            "posts/engine/rendering/Pipeline.md",
        );
        assert!(html.contains(r#"<a href="/posts/engine/rendering/Shaders.html">"#));
    }

    #[test]
    fn fragment_survives_rewriting() {
        let html = render(
            "See [part two](Shaders.md#part-2).",
            "posts/engine/rendering/Pipeline.md",
        );
        assert!(html.contains(r#"href="/posts/engine/rendering/Shaders.html#part-2""#));
    }

    #[test]
    fn fragment_is_percent_encoded() {
        let html = render(
            "See [x](<Shaders.md#two words>).",
            "posts/engine/rendering/Pipeline.md",
        );
        assert!(html.contains("#two%20words"));
    }

    #[test]
    fn external_link_opens_new_tab() {
        let html = render("See [docs](https://example.com/x).", "posts/worklog/January.md");
        assert!(html.contains(r#"target="_blank" rel="noopener""#));
        assert!(html.contains(r#"href="https://example.com/x""#));
    }

    #[test]
    fn mailto_renders_in_place() {
        let html = render("Mail [me](mailto:x@example.com).", "posts/worklog/January.md");
        assert!(html.contains(r#"href="mailto:x@example.com""#));
        assert!(!html.contains("_blank"));
    }

    #[test]
    fn dead_link_degrades_to_search() {
        let html = render("See [gone](Missing.md).", "posts/engine/core/Memory.md");
        assert!(html.contains(r#"href="/browse/index.html?q=Missing&scope=posts/engine""#));
    }

    #[test]
    fn asset_reference_left_untouched() {
        let html = render("![d](diagram.png) and [raw](data.csv)", "posts/worklog/January.md");
        assert!(html.contains(r#"src="diagram.png""#));
        assert!(html.contains(r#"href="data.csv""#));
    }

    #[test]
    fn empty_href_drops_anchor_keeps_text() {
        let html = render("A [label]() here.", "posts/worklog/January.md");
        assert!(!html.contains("<a"));
        assert!(html.contains("label"));
    }

    #[test]
    fn link_title_is_escaped() {
        let html = render(
            "[x](Memory.md \"a \\\"quoted\\\" title\")",
            "posts/engine/core/Tasks.md",
        );
        assert!(html.contains("title=\"a &quot;quoted&quot; title\""));
    }

    #[test]
    fn href_for_search_scopes_query() {
        let target = LinkTarget::Search {
            query: "gpu caches".to_string(),
            scope: Some("posts/engine".to_string()),
        };
        let (href, new_tab) = href_for(&target);
        assert_eq!(href, "/browse/index.html?q=gpu%20caches&scope=posts/engine");
        assert!(!new_tab);
    }

    #[test]
    fn output_path_swaps_extension() {
        assert_eq!(html_output_path("posts/a/x.md"), "posts/a/x.html");
    }

    #[test]
    fn browse_root_href() {
        assert_eq!(browse_href(""), "/browse/index.html");
        assert_eq!(browse_href("engine/core"), "/browse/engine/core/index.html");
    }

    // =========================================================================
    // Page renderer tests
    // =========================================================================

    #[test]
    fn index_page_lists_every_post() {
        let (index, config) = setup();
        let html = render_index(&index, &config).into_string();
        assert!(html.contains("4 posts"));
        assert!(html.contains("/posts/worklog/January.html"));
        assert!(html.contains("Pipeline"));
    }

    #[test]
    fn browse_page_shows_counts_and_listing() {
        let (index, config) = setup();
        let tree = SectionNode::build(index.posts().iter(), &config.section_root);
        let engine = tree.children.iter().find(|c| c.name == "engine").unwrap();
        let html = render_browse_page(&tree, engine, &index, &config).into_string();

        assert!(html.contains(r#"<span class="tree-count">3</span>"#));
        assert!(html.contains("3 docs"));
        // Listing is path-sorted: core/Memory before rendering/Pipeline
        let memory = html.find("/posts/engine/core/Memory.html").unwrap();
        let pipeline = html.find("/posts/engine/rendering/Pipeline.html").unwrap();
        assert!(memory < pipeline);
    }

    #[test]
    fn browse_page_expands_selected_path() {
        let (index, config) = setup();
        let tree = SectionNode::build(index.posts().iter(), &config.section_root);
        let engine = tree.children.iter().find(|c| c.name == "engine").unwrap();
        let rendering = engine.children.iter().find(|c| c.name == "rendering").unwrap();
        let html = render_browse_page(&tree, rendering, &index, &config).into_string();

        // engine (ancestor) and rendering (selected) are open; worklog is not
        assert!(html.contains("open"));
        let worklog_pos = html.find(">worklog<").unwrap();
        let before_worklog = &html[..worklog_pos];
        let last_details = before_worklog.rfind("<details").unwrap();
        assert!(!html[last_details..worklog_pos].contains("open"));
    }

    #[test]
    fn post_page_has_validated_back_link() {
        let (index, config) = setup();
        let resolver = LinkResolver::new(&index, &config);
        let post = index.get("posts/engine/core/Memory.md").unwrap();
        let html = render_post_page(post, "Body text.", &resolver, &config).into_string();
        assert!(html.contains(r#"href="/browse/engine/core/index.html""#));
    }

    #[test]
    fn root_level_post_backs_to_browse_root() {
        let mut config = SiteConfig::default();
        config.section_root = "posts/".to_string();
        let post = PostRecord::stub("posts/Meta.md");
        assert_eq!(back_href(&post, &config), "/browse/index.html");
    }

    #[test]
    fn extract_links_finds_all_hrefs() {
        let links = extract_links("[a](x.md) text [b](https://e.com) ![img](i.png)");
        assert_eq!(links, vec!["x.md", "https://e.com"]);
    }
}
