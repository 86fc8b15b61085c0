//! Flat YAML-ish frontmatter parsing.
//!
//! Posts open with a delimited header of `key: value` lines:
//!
//! ```text
//! ---
//! title: "GPU Caches, Part 2"
//! date: "2025-03-14"
//! tags: ["gpu", "memory"]
//! ---
//! body...
//! ```
//!
//! This is deliberately not a YAML parser. The header format is flat:
//! one `key: value` per line, double-quoted scalars, bracketed string
//! lists. Lines without a colon are skipped. A file that doesn't open
//! with `---\n` (or never closes the header) is treated as all body.

use std::collections::BTreeMap;

/// A parsed frontmatter value: a scalar or a list of strings.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Scalar content, or `None` for lists.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    /// List content; a scalar is promoted to a one-element list, which is
    /// how single-tag frontmatter like `tags: gpu` is tolerated.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            FieldValue::Text(s) => vec![s.clone()],
            FieldValue::List(items) => items.clone(),
        }
    }
}

/// Split a document into its frontmatter fields and body.
///
/// The body is everything after the closing `\n---\n` marker. Without a
/// valid header the field map is empty and the body is the whole input.
pub fn parse(text: &str) -> (BTreeMap<String, FieldValue>, &str) {
    let Some(rest) = text.strip_prefix("---\n") else {
        return (BTreeMap::new(), text);
    };
    let Some(end) = rest.find("\n---\n") else {
        return (BTreeMap::new(), text);
    };

    let header = &rest[..end];
    let body = &rest[end + "\n---\n".len()..];

    let mut fields = BTreeMap::new();
    for line in header.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            continue;
        }
        fields.insert(key.to_string(), parse_value(value));
    }

    (fields, body)
}

/// Strip the frontmatter header, keeping only the body.
pub fn strip(text: &str) -> &str {
    parse(text).1
}

fn parse_value(value: &str) -> FieldValue {
    if let Some(inner) = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
    {
        let items = inner
            .split(',')
            .map(|item| unquote(item.trim()).to_string())
            .filter(|item| !item.is_empty())
            .collect();
        return FieldValue::List(items);
    }
    FieldValue::Text(unquote(value).to_string())
}

/// Remove one layer of matching double or single quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Extract a one-line summary from a markdown body.
///
/// Returns the first non-empty line that is neither a heading (`#`) nor a
/// table row (`|`), trimmed. `None` when no such line exists.
pub fn extract_summary(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('|'))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "---\n\
title: \"GPU Caches\"\n\
date: \"2025-03-14\"\n\
tags: [\"gpu\", \"memory\"]\n\
status: stable\n\
---\n\
# Heading\n\
\n\
First real paragraph.\n";

    #[test]
    fn parses_quoted_scalars() {
        let (fields, _) = parse(POST);
        assert_eq!(fields["title"].as_text(), Some("GPU Caches"));
        assert_eq!(fields["date"].as_text(), Some("2025-03-14"));
    }

    #[test]
    fn parses_unquoted_scalars() {
        let (fields, _) = parse(POST);
        assert_eq!(fields["status"].as_text(), Some("stable"));
    }

    #[test]
    fn parses_string_lists() {
        let (fields, _) = parse(POST);
        assert_eq!(
            fields["tags"],
            FieldValue::List(vec!["gpu".to_string(), "memory".to_string()])
        );
    }

    #[test]
    fn body_starts_after_closing_marker() {
        let (_, body) = parse(POST);
        assert!(body.starts_with("# Heading"));
    }

    #[test]
    fn no_header_means_empty_fields_full_body() {
        let text = "# Just a doc\n\nNo frontmatter here.";
        let (fields, body) = parse(text);
        assert!(fields.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn unclosed_header_treated_as_body() {
        let text = "---\ntitle: oops\nnever closed";
        let (fields, body) = parse(text);
        assert!(fields.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn lines_without_colon_are_skipped() {
        let text = "---\ntitle: ok\njust some words\n---\nbody";
        let (fields, _) = parse(text);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["title"].as_text(), Some("ok"));
    }

    #[test]
    fn value_with_colon_keeps_remainder() {
        let text = "---\ntitle: Part 1: Intro\n---\nbody";
        let (fields, _) = parse(text);
        assert_eq!(fields["title"].as_text(), Some("Part 1: Intro"));
    }

    #[test]
    fn single_quoted_values_unquoted() {
        let text = "---\ntrack: 'rendering'\n---\nbody";
        let (fields, _) = parse(text);
        assert_eq!(fields["track"].as_text(), Some("rendering"));
    }

    #[test]
    fn empty_list_items_dropped() {
        let text = "---\ntags: [\"a\", , \"b\"]\n---\nbody";
        let (fields, _) = parse(text);
        assert_eq!(
            fields["tags"],
            FieldValue::List(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn scalar_promotes_to_one_element_list() {
        assert_eq!(
            FieldValue::Text("gpu".to_string()).to_list(),
            vec!["gpu".to_string()]
        );
    }

    #[test]
    fn strip_removes_header() {
        assert_eq!(strip(POST), "# Heading\n\nFirst real paragraph.\n");
    }

    #[test]
    fn strip_keeps_headerless_text() {
        assert_eq!(strip("plain"), "plain");
    }

    // =========================================================================
    // extract_summary() tests
    // =========================================================================

    #[test]
    fn summary_skips_headings_and_blanks() {
        let body = "# Title\n\n## Sub\n\nThe actual summary line.\nMore.";
        assert_eq!(
            extract_summary(body),
            Some("The actual summary line.".to_string())
        );
    }

    #[test]
    fn summary_skips_table_rows() {
        let body = "# T\n| a | b |\n|---|---|\nAfter the table.";
        assert_eq!(extract_summary(body), Some("After the table.".to_string()));
    }

    #[test]
    fn summary_none_for_headings_only() {
        assert_eq!(extract_summary("# One\n## Two\n"), None);
    }

    #[test]
    fn summary_trims_whitespace() {
        assert_eq!(extract_summary("   padded line  \n"), Some("padded line".to_string()));
    }
}
