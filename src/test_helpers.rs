//! Shared test utilities for the waypost test suite.
//!
//! Provides fixture writers for on-disk content trees and lookup helpers
//! over scan-phase data structures (`Manifest`, `PostRecord`).

use std::path::Path;

use crate::scan::Manifest;
use crate::types::PostRecord;

// =========================================================================
// Fixture setup
// =========================================================================

/// Write a post file under `root`, creating parent directories.
pub fn write_post(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Write a minimal frontmattered post with just a title and one body line.
pub fn write_titled_post(root: &Path, rel: &str, title: &str) {
    write_post(
        root,
        rel,
        &format!("---\ntitle: \"{title}\"\n---\n# {title}\n\nBody of {title}.\n"),
    );
}

// =========================================================================
// Manifest lookups — panics with a clear message on miss
// =========================================================================

/// Find a post by path. Panics if not found.
pub fn find_post<'a>(manifest: &'a Manifest, path: &str) -> &'a PostRecord {
    manifest
        .posts
        .iter()
        .find(|p| p.path == path)
        .unwrap_or_else(|| {
            let paths: Vec<&str> = manifest.posts.iter().map(|p| p.path.as_str()).collect();
            panic!("post '{path}' not found. Available: {paths:?}")
        })
}

/// All post paths in manifest order.
pub fn post_paths(manifest: &Manifest) -> Vec<&str> {
    manifest.posts.iter().map(|p| p.path.as_str()).collect()
}
