//! Return-link validation for reader-supplied navigation tokens.
//!
//! Post pages carry a "back" link whose target may originate from a query
//! parameter — attacker-controllable input. An unchecked token would let a
//! crafted URL turn the back link into `javascript:...`, a protocol-relative
//! `//evil.example`, or an absolute path outside the site. The validator maps
//! every possible token to a safe same-site href; it never errors.
//!
//! Accepted shapes, in order:
//!
//! 1. empty → the landing page
//! 2. `?query` → landing page with the query string appended verbatim
//! 3. `./relative` → accepted verbatim
//! 4. `known-page.html?...` → accepted with a `./` prefix enforced, when the
//!    first segment is on the configured allow-list
//!
//! Everything else — scheme prefixes, `//`, leading `/`, unknown pages —
//! falls back to the landing page.

/// True when `token` opens with a URL scheme (`[a-zA-Z][a-zA-Z0-9+.-]*:`).
pub fn has_scheme(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    for c in chars {
        match c {
            ':' => return true,
            c if c.is_ascii_alphanumeric() => {}
            '+' | '.' | '-' => {}
            _ => return false,
        }
    }
    false
}

/// Neutralize a raw return-to token into a safe same-site href.
///
/// `landing` is the default target (e.g. `index.html`); `allowed_pages` is
/// the configured list of known top-level page names.
pub fn safe_return_href(token: &str, landing: &str, allowed_pages: &[String]) -> String {
    let token = token.trim();
    if token.is_empty() {
        return format!("./{landing}");
    }
    if token.starts_with('?') {
        return format!("./{landing}{token}");
    }
    // Protocol injection, protocol-relative, and absolute-path escapes.
    if has_scheme(token) || token.starts_with("//") || token.starts_with('/') {
        return format!("./{landing}");
    }
    if let Some(rest) = token.strip_prefix("./") {
        if rest.starts_with('/') {
            // ".//host" is protocol-relative after one browser normalization
            return format!("./{landing}");
        }
        return token.to_string();
    }

    let first_segment = token
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(token);
    if allowed_pages.iter().any(|page| page == first_segment) {
        return format!("./{token}");
    }

    format!("./{landing}")
}
