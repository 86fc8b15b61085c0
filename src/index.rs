//! The immutable post index and its derived lookup caches.
//!
//! Built once from the manifest's ordered post list, then treated as
//! read-only for the rest of the session. Everything downstream — link
//! resolution, the section tree, filtering — recomputes its view from
//! this one structure, so repeated passes are idempotent by construction.
//!
//! Two caches are derived at build time:
//!
//! - the **path set**, for O(1) "does this document exist" checks;
//! - the **basename index**, mapping a final path segment to every full
//!   path sharing it, in manifest order. The link resolver uses it as the
//!   last lookup step before giving up on a moved document.

use crate::types::PostRecord;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("duplicate post path in manifest: {0}")]
    DuplicatePath(String),
    #[error("post with empty path in manifest")]
    EmptyPath,
}

/// Immutable snapshot of every known post.
#[derive(Debug)]
pub struct PostIndex {
    posts: Vec<PostRecord>,
    path_set: HashSet<String>,
    basename_index: HashMap<String, Vec<String>>,
}

impl PostIndex {
    /// Build the index and its derived caches.
    ///
    /// A duplicate or empty `path` is a manifest contract breach and fails
    /// the whole load — silently keeping one of two records would corrupt
    /// every derived structure.
    pub fn build(posts: Vec<PostRecord>) -> Result<Self, IndexError> {
        let mut path_set = HashSet::with_capacity(posts.len());
        let mut basename_index: HashMap<String, Vec<String>> = HashMap::new();

        for post in &posts {
            if post.path.is_empty() {
                return Err(IndexError::EmptyPath);
            }
            if !path_set.insert(post.path.clone()) {
                return Err(IndexError::DuplicatePath(post.path.clone()));
            }
            basename_index
                .entry(post.basename().to_string())
                .or_default()
                .push(post.path.clone());
        }

        Ok(PostIndex {
            posts,
            path_set,
            basename_index,
        })
    }

    /// All posts in manifest order.
    pub fn posts(&self) -> &[PostRecord] {
        &self.posts
    }

    /// Consume the index, handing the validated records back.
    pub fn into_posts(self) -> Vec<PostRecord> {
        self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Whether `path` is a live document.
    pub fn contains(&self, path: &str) -> bool {
        self.path_set.contains(path)
    }

    /// Record lookup by exact path.
    pub fn get(&self, path: &str) -> Option<&PostRecord> {
        // Linear scan is fine at manifest scale; the hot membership check
        // goes through the path set instead.
        self.posts.iter().find(|p| p.path == path)
    }

    /// Every full path whose final segment is `basename`, manifest order.
    pub fn by_basename(&self, basename: &str) -> &[String] {
        self.basename_index
            .get(basename)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
