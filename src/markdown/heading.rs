use std::collections::HashSet;

/// Fallback identifier for headings whose text has no usable characters.
const EMPTY_HEADING_ID: &str = "heading";

/// Converts heading text into an anchor identifier.
///
/// Alphanumeric characters are lowercased, `-` and `_` are kept, runs of
/// whitespace become `-`, and everything else is dropped.
///
/// # Examples
///
/// ```
/// use md2opml::markdown::slugify;
///
/// assert_eq!(slugify("Tech News"), "tech-news");
/// assert_eq!(slugify("C++ & Rust!"), "c-rust");
/// assert_eq!(slugify("???"), "heading");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.trim().chars() {
        if c.is_whitespace() {
            pending_dash = true;
            continue;
        }
        if !(c.is_alphanumeric() || c == '-' || c == '_') {
            continue;
        }
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        slug.extend(c.to_lowercase());
    }

    if slug.is_empty() {
        EMPTY_HEADING_ID.to_string()
    } else {
        slug
    }
}

/// Hands out unique heading identifiers in document order.
///
/// Explicit ids (`# Title {#custom}`) are taken as-is and reserved; generated
/// ids that collide with an earlier one get a `-1`, `-2`, ... suffix.
#[derive(Debug, Default)]
pub(crate) struct HeadingIds {
    seen: HashSet<String>,
}

impl HeadingIds {
    pub(crate) fn resolve(&mut self, explicit: &str, text: &str) -> String {
        if !explicit.is_empty() {
            self.seen.insert(explicit.to_string());
            return explicit.to_string();
        }

        let base = slugify(text);
        let mut candidate = base.clone();
        let mut suffix = 0;
        while self.seen.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}-{suffix}");
        }
        self.seen.insert(candidate.clone());
        candidate
    }
}
