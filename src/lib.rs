//! # Waypost
//!
//! A static site generator for browsable markdown note collections. Your
//! filesystem is the data source: a directory tree of markdown posts becomes
//! a site with a chronological index, a directory-tree browse view, and
//! per-post pages whose internal links survive the collection's constant
//! reshuffling.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! Waypost processes content through two independent stages, joined by a
//! JSON manifest:
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (filesystem → structured data)
//! 2. Generate  manifest  →  dist/           (final HTML site)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Debuggability**: the manifest is human-readable JSON you can inspect.
//! - **Auditability**: `check` and `list` run against the same data the
//!   generator consumes, so what they report is what gets rendered.
//! - **Testability**: the generate stage is a function of the manifest, so
//!   tests can exercise rendering without a content directory on disk.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — walks post directories, parses frontmatter, produces the manifest |
//! | [`generate`] | Stage 2 — renders the final HTML site from the manifest using Maud |
//! | [`index`] | Immutable post index with path and basename lookup caches |
//! | [`resolve`] | Link resolution: raw hrefs → navigation decisions via a fallback chain |
//! | [`normalize`] | Pure relative-path arithmetic (`..`/`.` segments, root clamping) |
//! | [`backnav`] | Back-navigation token validation (same-site allow-listing) |
//! | [`tree`] | Section tree with per-directory descendant counts |
//! | [`filter`] | Filter and search evaluation over the index |
//! | [`frontmatter`] | Flat `key: value` frontmatter parser and summary extraction |
//! | [`config`] | `config.toml` loading and validation, alias table included |
//! | [`types`] | Shared types serialized between stages (`PostRecord`, `TagCount`) |
//! | [`output`] | CLI output formatting — pure `format_*` functions per stage |
//!
//! # Design Decisions
//!
//! ## Links That Refuse to Die
//!
//! Posts reference each other relatively, and the tree they were written
//! against keeps changing. Instead of emitting authored hrefs verbatim,
//! every in-document link is resolved against the index at render time and
//! degrades through a fallback chain — direct path, curated alias, unique
//! basename, search page — so the reader always lands somewhere useful.
//! See [`resolve`] for the chain's precedence rules.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system, rather than Handlebars or Tera:
//!
//! - **Compile-time checking**: malformed HTML is a build error.
//! - **Type-safe**: template variables are Rust expressions.
//! - **XSS-safe by default**: all interpolation is auto-escaped.
//! - **Zero runtime files**: no template directory to ship.
//!
//! ## Static Output, No Runtime
//!
//! The output is plain HTML with one embedded stylesheet. No client-side
//! router, no JSON fetched at page load: the tree, the counts, and every
//! resolved link are baked in at generate time. The site can be dropped on
//! any file server.

pub mod backnav;
pub mod config;
pub mod filter;
pub mod frontmatter;
pub mod generate;
pub mod index;
pub mod normalize;
pub mod output;
pub mod resolve;
pub mod scan;
pub mod tree;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
