//! Section tree: browse the collection by directory hierarchy.
//!
//! Groups posts by the path segments under the configured section root,
//! producing a navigable folder tree with per-node descendant counts. Built
//! fresh from the index whenever the browse scope changes; never mutated in
//! place.
//!
//! Posts attach to the node of their containing directory — the filename is
//! never a tree node. Children keep first-seen insertion order internally
//! and are sorted alphabetically at render time via [`SectionNode::sorted_children`].

use crate::types::PostRecord;

/// One directory under the section root.
#[derive(Debug)]
pub struct SectionNode<'a> {
    /// Single path segment (empty for the root).
    pub name: String,
    /// Segments joined from the root (`"engine/rendering"`, empty for root).
    pub path: String,
    /// Child directories in first-seen order; names unique.
    pub children: Vec<SectionNode<'a>>,
    /// Posts whose directory is exactly this node's path.
    pub items: Vec<&'a PostRecord>,
    /// Posts in this node plus all descendants.
    pub descendant_count: usize,
}

impl<'a> SectionNode<'a> {
    fn new(name: &str, path: String) -> Self {
        SectionNode {
            name: name.to_string(),
            path,
            children: Vec::new(),
            items: Vec::new(),
            descendant_count: 0,
        }
    }

    /// Build the tree for every post under `section_root`. Posts outside
    /// the root prefix are excluded entirely.
    pub fn build(
        posts: impl IntoIterator<Item = &'a PostRecord>,
        section_root: &str,
    ) -> SectionNode<'a> {
        let mut root = SectionNode::new("", String::new());

        for post in posts {
            let Some(rel) = post.path.strip_prefix(section_root) else {
                continue;
            };
            let segments: Vec<&str> = rel.split('/').filter(|s| !s.is_empty()).collect();
            let Some((_filename, dirs)) = segments.split_last() else {
                continue;
            };

            let mut node = &mut root;
            let mut joined = String::new();
            for dir in dirs {
                if !joined.is_empty() {
                    joined.push('/');
                }
                joined.push_str(dir);

                let pos = match node.children.iter().position(|c| c.name == *dir) {
                    Some(pos) => pos,
                    None => {
                        node.children.push(SectionNode::new(dir, joined.clone()));
                        node.children.len() - 1
                    }
                };
                node = &mut node.children[pos];
            }
            node.items.push(post);
        }

        root.compute_counts();
        root
    }

    /// Post-order pass establishing
    /// `descendant_count = |items| + Σ child.descendant_count`.
    fn compute_counts(&mut self) -> usize {
        let mut count = self.items.len();
        for child in &mut self.children {
            count += child.compute_counts();
        }
        self.descendant_count = count;
        count
    }

    /// Children in render order (alphabetical by segment name).
    pub fn sorted_children(&self) -> Vec<&SectionNode<'a>> {
        let mut children: Vec<&SectionNode<'a>> = self.children.iter().collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    /// Whether this node should render expanded when `selected` is the
    /// currently browsed directory: true for the root, for the selected
    /// node itself, and for any of its ancestors.
    pub fn default_open(&self, selected: &str) -> bool {
        if self.path.is_empty() {
            return true;
        }
        if selected.is_empty() {
            return false;
        }
        selected == self.path || selected.starts_with(&format!("{}/", self.path))
    }

    /// Every node in the tree, pre-order, root first.
    pub fn nodes(&self) -> Vec<&SectionNode<'a>> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.nodes());
        }
        out
    }
}
