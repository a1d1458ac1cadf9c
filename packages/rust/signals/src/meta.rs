//! Flat metadata extraction from an HTML document.
//!
//! Parsing goes through `scraper` (html5ever), which recovers from any
//! malformed markup, so extraction cannot fail: missing pieces come back empty.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use toolcatalog_shared::PageMeta;

static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector"));
static H1_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("h1 selector"));
static META_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("meta selector"));

/// `<meta>` values we care about. A repeated key keeps its last value.
#[derive(Default)]
struct MetaTags {
    description: Option<String>,
    keywords: Option<String>,
    og_description: Option<String>,
    og_title: Option<String>,
}

impl MetaTags {
    fn collect(doc: &Html) -> Self {
        let mut tags = Self::default();

        for el in doc.select(&META_SEL) {
            let attrs = el.value();
            let content = attrs.attr("content").unwrap_or_default().to_string();
            let name = attrs.attr("name").unwrap_or_default().to_lowercase();
            let property = attrs.attr("property").unwrap_or_default().to_lowercase();

            match name.as_str() {
                "description" => tags.description = Some(content.clone()),
                "keywords" => tags.keywords = Some(content.clone()),
                _ => {}
            }
            match property.as_str() {
                "og:description" => tags.og_description = Some(content),
                "og:title" => tags.og_title = Some(content),
                _ => {}
            }
        }

        tags
    }
}

/// Extract title, h1, description and keywords from raw HTML.
pub fn extract_page_meta(html: &str) -> PageMeta {
    if html.trim().is_empty() {
        return PageMeta::default();
    }

    let doc = Html::parse_document(html);
    let tags = MetaTags::collect(&doc);

    let mut title = joined_text(doc.select(&TITLE_SEL));
    if title.is_empty() {
        title = tags.og_title.unwrap_or_default();
    }

    let description = tags
        .description
        .filter(|d| !d.is_empty())
        .or(tags.og_description)
        .unwrap_or_default();

    PageMeta {
        title,
        description,
        keywords: tags.keywords.unwrap_or_default(),
        h1: joined_text(doc.select(&H1_SEL)),
    }
}

/// Every non-blank text node under the given elements, trimmed and space-joined.
fn joined_text<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    elements
        .flat_map(|el| el.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
