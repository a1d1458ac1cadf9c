//! Product name guessing from page headings.

/// Title separators in priority order. The first one present in the heading
/// decides the split, even when a later one occurs earlier in the text.
pub const NAME_SEPARATORS: &[&str] = &[
    " | ", " - ", " — ", " – ", "｜", "|", "—", "–", "-",
];

/// Guess a product name from a page's `<h1>` (preferred) or `<title>`.
///
/// `"Acme AI — Build agents fast"` becomes `"Acme AI"`.
pub fn guess_name(title: &str, h1: &str) -> String {
    let base = if h1.is_empty() { title } else { h1 };
    if base.is_empty() {
        return String::new();
    }

    NAME_SEPARATORS
        .iter()
        .find_map(|sep| base.split_once(sep))
        .map_or(base, |(head, _)| head)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn em_dash_title() {
        assert_eq!(guess_name("Acme AI — Build agents fast", ""), "Acme AI");
    }

    #[test]
    fn h1_preferred_over_title() {
        assert_eq!(guess_name("Acme | Home", "Acme Studio"), "Acme Studio");
        assert_eq!(guess_name("Acme | Home", ""), "Acme");
    }

    #[test]
    fn separator_priority_beats_position() {
        // " | " outranks " - " even though the hyphen comes first in the text.
        assert_eq!(guess_name("Foo - Bar | Baz", ""), "Foo - Bar");
        assert_eq!(guess_name("Foo — Bar - Baz", ""), "Foo — Bar");
    }

    #[test]
    fn bare_separators() {
        assert_eq!(guess_name("Notion｜笔记", ""), "Notion");
        assert_eq!(guess_name("Foo|Bar", ""), "Foo");
        assert_eq!(guess_name("Co-Pilot", ""), "Co");
    }

    #[test]
    fn no_separator_returns_trimmed() {
        assert_eq!(guess_name("  Linear  ", ""), "Linear");
    }

    #[test]
    fn empty_input() {
        assert_eq!(guess_name("", ""), "");
    }
}
