//! Slug generation and token extraction from free text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Phrases outside this length range (in characters, after trimming) are dropped.
const MIN_PHRASE_CHARS: usize = 2;
const MAX_PHRASE_CHARS: usize = 24;

/// Runs of anything that is not a lowercase ASCII letter or digit.
static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug regex"));

/// Phrase delimiters: Latin and CJK commas, full stops, semicolons, slashes,
/// bullets and line breaks.
static PHRASE_DELIM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[，,。;；/•·、\n\r]+").expect("delimiter regex"));

/// Generate a URL-safe slug: lowercase ASCII words joined by single hyphens.
///
/// Idempotent: `slugify(&slugify(s)) == slugify(s)`.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    NON_SLUG_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Split free text into at most `max_items` short phrases, in original order.
///
/// Pieces are trimmed; those shorter than 2 or longer than 24 characters are
/// discarded before the cap is applied.
pub fn split_features(text: &str, max_items: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    PHRASE_DELIM_RE
        .split(text)
        .map(str::trim)
        .filter(|piece| {
            let len = piece.chars().count();
            (MIN_PHRASE_CHARS..=MAX_PHRASE_CHARS).contains(&len)
        })
        .take(max_items)
        .map(String::from)
        .collect()
}

/// Remove duplicates, keeping the first occurrence of each value.
pub fn dedup_preserving<T, I>(items: I) -> Vec<T>
where
    T: Eq + std::hash::Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
