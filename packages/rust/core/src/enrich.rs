//! Filling empty tool fields from the tool's own web pages.
//!
//! Enrichment only ever writes fields that are currently empty; curated
//! values are never replaced by inferred ones. Skipping it entirely leaves a
//! tool that is still valid input for the merger.

use tracing::{debug, instrument};

use toolcatalog_crawler::PageFetcher;
use toolcatalog_shared::{EnrichSettings, Tool};
use toolcatalog_signals::{
    detect_platforms, detect_price_model, extract_page_meta, guess_name, slugify, split_features,
};

use crate::normalize::tool_id_for;

/// Anything that can turn a URL into page text, `""` on failure.
pub trait PageSource: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = String> + Send;
}

impl PageSource for PageFetcher {
    async fn fetch(&self, url: &str) -> String {
        PageFetcher::fetch(self, url).await
    }
}

/// Fetch the website and pricing pages of `tool` and fill its empty fields.
///
/// Fill order: name (plus a defaulted slug/id), features, tags, price model,
/// platforms. Each step checks only its own field.
#[instrument(skip_all, fields(slug = %tool.slug))]
pub async fn enrich_tool<S: PageSource>(
    mut tool: Tool,
    pages: &S,
    limits: &EnrichSettings,
) -> Tool {
    let website_html = pages.fetch(&tool.website_url).await;
    let pricing_html = pages.fetch(&tool.pricing_url).await;

    let filled = fill_empty_fields(&mut tool, &website_html, &pricing_html, limits);

    debug!(
        fields = ?filled,
        website_bytes = website_html.len(),
        pricing_bytes = pricing_html.len(),
        "tool enriched"
    );

    tool
}

/// Fill the empty fields of `tool` from already fetched pages and return the
/// names of the fields that received a value.
fn fill_empty_fields(
    tool: &mut Tool,
    website_html: &str,
    pricing_html: &str,
    limits: &EnrichSettings,
) -> Vec<&'static str> {
    let meta = extract_page_meta(website_html);
    let combined = format!("{website_html} {pricing_html}");
    let combined = combined.trim();

    let mut filled = Vec::new();

    if tool.name.is_empty() {
        let defaulted_id = tool.id.is_empty() || tool.id == tool_id_for(&tool.slug);
        tool.name = guess_name(&meta.title, &meta.h1);
        if tool.slug.is_empty() {
            tool.slug = slugify(&tool.name);
        }
        if defaulted_id {
            tool.id = tool_id_for(&tool.slug);
        }
        if !tool.name.is_empty() {
            filled.push("name");
        }
    }

    if tool.features.is_empty() {
        tool.features = split_features(&meta.description, limits.max_features);
        if tool.features.is_empty() {
            tool.features = split_features(&meta.h1, limits.max_features);
        }
        if !tool.features.is_empty() {
            filled.push("features");
        }
    }

    if tool.tags.is_empty() {
        tool.tags = split_features(&meta.keywords, limits.max_tags);
        if !tool.tags.is_empty() {
            filled.push("tags");
        }
    }

    if tool.price_model.is_empty() {
        if let Some(model) = detect_price_model(combined) {
            tool.price_model = model.to_string();
            filled.push("priceModel");
        }
    }

    if tool.platforms.is_empty() {
        tool.platforms = detect_platforms(combined, &tool.website_url)
            .iter()
            .map(ToString::to_string)
            .collect();
        if !tool.platforms.is_empty() {
            filled.push("platforms");
        }
    }

    filled
}
