//! Mapping curated input records onto the canonical [`Tool`] shape.

use toolcatalog_shared::{STATUS_ACTIVE, Tool, ToolInput};
use toolcatalog_signals::{dedup_preserving, slugify};

/// Default tool id for a slug.
pub fn tool_id_for(slug: &str) -> String {
    format!("t_{slug}")
}

/// Normalize an input record. Never fails: every missing field gets its
/// documented default.
///
/// - text fields default to `""`; `name` and the URLs are trimmed
/// - list fields default to `[]`; tags, platforms, categories and sources are de-duplicated
/// - `status` defaults to `"active"`
/// - `slug` defaults to `slugify(name)`, `id` to `t_<slug>` (empty values count as absent)
pub fn normalize_tool(input: ToolInput) -> Tool {
    let name = trimmed(input.name);
    let slug = non_empty(input.slug).unwrap_or_else(|| slugify(&name));
    let id = non_empty(input.id).unwrap_or_else(|| tool_id_for(&slug));

    Tool {
        id,
        name,
        slug,
        logo_url: input.logo_url.unwrap_or_default(),
        website_url: trimmed(input.website_url),
        pricing_url: trimmed(input.pricing_url),
        trial_url: trimmed(input.trial_url),
        category_ids: dedup_preserving(input.category_ids.unwrap_or_default()),
        tags: dedup_preserving(input.tags.unwrap_or_default()),
        price_model: input.price_model.unwrap_or_default(),
        price_plans: input.price_plans.unwrap_or_default(),
        features: input.features.unwrap_or_default(),
        platforms: dedup_preserving(input.platforms.unwrap_or_default()),
        audiences: input.audiences.unwrap_or_default(),
        updated_at: input.updated_at.unwrap_or_default(),
        source_ids: dedup_preserving(input.source_ids.unwrap_or_default()),
        status: input.status.unwrap_or_else(|| STATUS_ACTIVE.into()),
        extra: Default::default(),
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
