//! Core domain types for the tool catalog.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Status assigned to tools that do not declare one.
pub const STATUS_ACTIVE: &str = "active";

/// Source type for provenance records derived from a tool's own website.
pub const SOURCE_TYPE_OFFICIAL: &str = "official";

// ---------------------------------------------------------------------------
// Tool
// ---------------------------------------------------------------------------

/// Canonical tool record as stored in `catalog.json`. Identity is `slug`.
///
/// Existing catalogs are hand-edited, so a `null` field reads as its default
/// instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tool {
    /// Stable identifier, `t_<slug>` unless curated.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Lowercase, hyphen-separated identity key.
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub logo_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub website_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pricing_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub trial_url: String,
    /// Set-like list of category ids.
    #[serde(deserialize_with = "null_as_default")]
    pub category_ids: Vec<String>,
    /// Free-form tags, order-preserving and de-duplicated.
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// One of `freemium`, `free`, `usage`, `enterprise`, `subscription`, or empty.
    #[serde(deserialize_with = "null_as_default")]
    pub price_model: String,
    /// Curated price plans (opaque to this tool).
    #[serde(deserialize_with = "null_as_default")]
    pub price_plans: Vec<Value>,
    /// Short feature phrases.
    #[serde(deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    /// Platforms from the closed vocabulary (`web`, `ios`, `android`, `api`, `desktop`).
    #[serde(deserialize_with = "null_as_default")]
    pub platforms: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub audiences: Vec<String>,
    /// Date of the last merge, `YYYY-MM-DD`.
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
    /// Ids of [`Source`] records backing this tool.
    #[serde(deserialize_with = "null_as_default")]
    pub source_ids: Vec<String>,
    #[serde(deserialize_with = "null_as_active")]
    pub status: String,
    /// Fields this schema does not know about, kept verbatim.
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Default for Tool {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            slug: String::new(),
            logo_url: String::new(),
            website_url: String::new(),
            pricing_url: String::new(),
            trial_url: String::new(),
            category_ids: Vec::new(),
            tags: Vec::new(),
            price_model: String::new(),
            price_plans: Vec::new(),
            features: Vec::new(),
            platforms: Vec::new(),
            audiences: Vec::new(),
            updated_at: String::new(),
            source_ids: Vec::new(),
            status: STATUS_ACTIVE.into(),
            extra: Map::new(),
        }
    }
}

/// A tool as it appears in the curated input list. Every field is optional;
/// `null` and absence are treated the same.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolInput {
    pub id: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub pricing_url: Option<String>,
    pub trial_url: Option<String>,
    pub category_ids: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub price_model: Option<String>,
    pub price_plans: Option<Vec<Value>>,
    pub features: Option<Vec<String>>,
    pub platforms: Option<Vec<String>>,
    pub audiences: Option<Vec<String>>,
    pub updated_at: Option<String>,
    pub source_ids: Option<Vec<String>>,
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Provenance record, one per distinct website host.
///
/// Only `id` is meaningful when reading an existing catalog; other keys are
/// optional and unknown ones are written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    /// `s_<slugified host>`.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Name of the tool that first registered this host.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    /// Fields this schema does not know about, kept verbatim.
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The persisted catalog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Catalog {
    /// UTC timestamp of the run that produced this file.
    #[serde(deserialize_with = "null_as_default")]
    pub generated_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sources: Vec<Source>,
    /// Passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub tools: Vec<Tool>,
    /// Passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparisons: Option<Value>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            generated_at: String::new(),
            sources: Vec::new(),
            categories: None,
            tools: Vec::new(),
            comparisons: None,
        }
    }
}

/// `comparisons` value written when neither the catalog nor the input has one.
pub fn default_comparisons() -> Value {
    serde_json::json!({ "fields": [] })
}

/// The curated input file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDocument {
    pub tools: Vec<ToolInput>,
    pub categories: Option<Value>,
    pub comparisons: Option<Value>,
}

// ---------------------------------------------------------------------------
// PageMeta
// ---------------------------------------------------------------------------

/// Metadata pulled out of one fetched HTML page. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    /// `<title>` text, or `og:title` when the title is empty.
    pub title: String,
    /// `meta[name=description]`, or `og:description`.
    pub description: String,
    /// `meta[name=keywords]`.
    pub keywords: String,
    /// Text of every `<h1>`, space-joined.
    pub h1: String,
}

/// Read `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read a `null` tool status as [`STATUS_ACTIVE`].
fn null_as_active<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(|| STATUS_ACTIVE.into()))
}
