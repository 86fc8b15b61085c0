//! Relative path resolution for in-document links.
//!
//! Markdown bodies reference sibling documents with relative paths
//! (`../rendering/Pipeline.md`, `./Notes.md`, `Appendix.md`). Before the
//! link resolver can look a reference up in the index it has to be turned
//! into the same canonical, slash-separated form the manifest uses. That
//! conversion is a pure string algorithm with no filesystem involved.

/// Resolve a relative `reference` against the document at `base`.
///
/// The base's final segment (the filename) is dropped, the reference's
/// segments are appended, and `.`/`..`/empty segments are folded left to
/// right. `..` at the root is clamped rather than rejected — a reference
/// that climbs above the tree resolves to the shortest valid path:
///
/// - `("docs/a/x.md", "../b/z.md")` → `"docs/b/z.md"`
/// - `("docs/a/x.md", "y.md")` → `"docs/a/y.md"`
/// - `("a/b/c.md", "../../../x.md")` → `"x.md"` (clamped, no leading `..`)
pub fn resolve_relative(base: &str, reference: &str) -> String {
    let dir_end = base.rfind('/').unwrap_or(0);
    let dir = &base[..dir_end];

    let mut stack: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();

    for segment in reference.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }

    stack.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_reference_resolves_in_same_directory() {
        assert_eq!(resolve_relative("docs/a/x.md", "y.md"), "docs/a/y.md");
    }

    #[test]
    fn parent_reference_crosses_directories() {
        assert_eq!(resolve_relative("docs/a/x.md", "../b/z.md"), "docs/b/z.md");
    }

    #[test]
    fn dot_segments_are_dropped() {
        assert_eq!(resolve_relative("docs/a/x.md", "./y.md"), "docs/a/y.md");
        assert_eq!(resolve_relative("docs/a/x.md", "./b/./z.md"), "docs/a/b/z.md");
    }

    #[test]
    fn empty_segments_are_dropped() {
        assert_eq!(resolve_relative("docs/a/x.md", "b//z.md"), "docs/a/b/z.md");
    }

    #[test]
    fn underflow_clamps_at_root() {
        assert_eq!(resolve_relative("a/b/c.md", "../../../x.md"), "x.md");
        assert_eq!(resolve_relative("a.md", "../../x.md"), "x.md");
    }

    #[test]
    fn no_leading_dotdot_ever_survives() {
        let resolved = resolve_relative("a/b/c.md", "../../../../deep/x.md");
        assert!(!resolved.starts_with(".."));
        assert_eq!(resolved, "deep/x.md");
    }

    #[test]
    fn base_without_directory_resolves_from_root() {
        assert_eq!(resolve_relative("index.md", "docs/a.md"), "docs/a.md");
    }

    #[test]
    fn resolution_is_deterministic() {
        let a = resolve_relative("posts/x/y.md", "../z/w.md");
        let b = resolve_relative("posts/x/y.md", "../z/w.md");
        assert_eq!(a, b);
    }

    #[test]
    fn canonical_path_survives_self_resolution() {
        // Resolving a root-anchored reference from its own location is a no-op.
        assert_eq!(
            resolve_relative("docs/a/x.md", "../a/x.md"),
            "docs/a/x.md"
        );
    }

    #[test]
    fn deep_nesting() {
        assert_eq!(
            resolve_relative("p/q/r/s/t.md", "../../u/v.md"),
            "p/q/u/v.md"
        );
    }
}
