//! Reconciling candidate tools against the existing catalog.
//!
//! [`CatalogMerger`] owns all state that spans tools within one run: the
//! existing entries indexed by slug, the [`SourceRegistry`], and the list of
//! tools merged so far. Candidates are absorbed one at a time, in input order;
//! [`CatalogMerger::finish`] appends the untouched existing entries and
//! produces the new [`Catalog`].

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};
use url::Url;

use toolcatalog_shared::{Catalog, SOURCE_TYPE_OFFICIAL, Source, Tool, default_comparisons};
use toolcatalog_signals::slugify;

/// `updatedAt` format.
const DATE_FORMAT: &str = "%Y-%m-%d";
/// `generatedAt` format.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// ---------------------------------------------------------------------------
// Source registry
// ---------------------------------------------------------------------------

/// Provenance records, one per website host, in insertion order.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: Vec<Source>,
    known: HashSet<String>,
}

impl SourceRegistry {
    /// Seed the registry with a catalog's sources. Records without an id are
    /// dropped; on duplicate ids the first record wins.
    pub fn from_existing(sources: Vec<Source>) -> Self {
        let mut registry = Self::default();
        for source in sources {
            if source.id.is_empty() {
                debug!(url = %source.url, "existing source has no id, dropping it");
                continue;
            }
            if registry.known.insert(source.id.clone()) {
                registry.sources.push(source);
            }
        }
        registry
    }

    /// Source id for a website URL: `s_<slugified host>`.
    ///
    /// The host is lower-cased and loses a leading `www.`; a non-default port
    /// is kept. Returns `None` when the URL has no parsable host.
    pub fn source_id_for(url: &str) -> Option<String> {
        let parsed = Url::parse(url.trim()).ok()?;
        let host = parsed.host_str()?.to_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);
        if host.is_empty() {
            return None;
        }

        let authority = match parsed.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        Some(format!("s_{}", slugify(&authority)))
    }

    /// Link `tool` to the source for its website, creating the source on
    /// first sight of the host. Returns `true` if a new source was created.
    pub fn register(&mut self, tool: &mut Tool) -> bool {
        if tool.website_url.is_empty() {
            return false;
        }
        let Some(id) = Self::source_id_for(&tool.website_url) else {
            debug!(url = %tool.website_url, "no host in website URL, no source");
            return false;
        };

        let created = self.known.insert(id.clone());
        if created {
            self.sources.push(Source {
                id: id.clone(),
                name: tool.name.clone(),
                url: tool.website_url.clone(),
                kind: SOURCE_TYPE_OFFICIAL.into(),
                ..Source::default()
            });
        }

        if !tool.source_ids.contains(&id) {
            tool.source_ids.push(id);
        }
        created
    }

    pub fn into_sources(self) -> Vec<Source> {
        self.sources
    }
}

// ---------------------------------------------------------------------------
// Merger
// ---------------------------------------------------------------------------

/// What happened to an absorbed candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No tool with this slug existed; the candidate was added as is.
    Created,
    /// The candidate was merged onto an existing or earlier tool.
    Updated,
}

/// Counters for one merge run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub created: usize,
    pub updated: usize,
    /// Existing tools carried over untouched.
    pub retained: usize,
    pub sources_added: usize,
}

/// Run-scoped merge state.
#[derive(Debug)]
pub struct CatalogMerger {
    existing: Vec<Tool>,
    existing_by_slug: HashMap<String, usize>,
    existing_categories: Option<Value>,
    existing_comparisons: Option<Value>,
    registry: SourceRegistry,
    merged: Vec<Tool>,
    merged_by_slug: HashMap<String, usize>,
    now: DateTime<Utc>,
    stats: MergeStats,
}

impl CatalogMerger {
    /// Start a merge against `existing`, stamping dates from `now`.
    ///
    /// When the existing catalog repeats a slug, the last entry is the one
    /// candidates merge onto.
    pub fn new(existing: Catalog, now: DateTime<Utc>) -> Self {
        let Catalog {
            sources,
            categories,
            tools,
            comparisons,
            ..
        } = existing;

        let existing_by_slug = tools
            .iter()
            .enumerate()
            .filter(|(_, tool)| !tool.slug.is_empty())
            .map(|(idx, tool)| (tool.slug.clone(), idx))
            .collect();

        Self {
            existing: tools,
            existing_by_slug,
            existing_categories: categories,
            existing_comparisons: comparisons,
            registry: SourceRegistry::from_existing(sources),
            merged: Vec::new(),
            merged_by_slug: HashMap::new(),
            now,
            stats: MergeStats::default(),
        }
    }

    fn today(&self) -> String {
        self.now.format(DATE_FORMAT).to_string()
    }

    /// Register the candidate's source and reconcile it by slug.
    ///
    /// Lookup checks tools already merged in this run before the existing
    /// catalog, so a slug never appears twice in the output. A candidate with
    /// an empty slug never matches anything.
    #[instrument(skip_all, fields(slug = %candidate.slug))]
    pub fn absorb(&mut self, mut candidate: Tool) -> MergeOutcome {
        if self.registry.register(&mut candidate) {
            self.stats.sources_added += 1;
        }

        let today = self.today();

        if candidate.slug.is_empty() {
            warn!(name = %candidate.name, "tool has an empty slug, adding without reconciliation");
            candidate.updated_at = today;
            self.merged.push(candidate);
            self.stats.created += 1;
            return MergeOutcome::Created;
        }

        if let Some(&idx) = self.merged_by_slug.get(&candidate.slug) {
            debug!("slug repeated in input, merging onto earlier candidate");
            merge_into(&mut self.merged[idx], candidate, today);
            self.stats.updated += 1;
            return MergeOutcome::Updated;
        }

        let slug = candidate.slug.clone();
        let outcome = match self.existing_by_slug.get(&slug) {
            Some(&idx) => {
                let mut base = self.existing[idx].clone();
                merge_into(&mut base, candidate, today);
                self.merged.push(base);
                self.stats.updated += 1;
                MergeOutcome::Updated
            }
            None => {
                candidate.updated_at = today;
                self.merged.push(candidate);
                self.stats.created += 1;
                MergeOutcome::Created
            }
        };
        self.merged_by_slug.insert(slug, self.merged.len() - 1);
        debug!(?outcome, "tool merged");
        outcome
    }

    /// Append retained tools and assemble the catalog.
    ///
    /// `categories` and `comparisons` come from the existing catalog when it
    /// has them, otherwise from the input, otherwise from fixed defaults.
    pub fn finish(
        mut self,
        input_categories: Option<Value>,
        input_comparisons: Option<Value>,
    ) -> (Catalog, MergeStats) {
        let generated_at = self.now.format(TIMESTAMP_FORMAT).to_string();

        for tool in std::mem::take(&mut self.existing) {
            if tool.slug.is_empty() || !self.merged_by_slug.contains_key(&tool.slug) {
                self.merged.push(tool);
                self.stats.retained += 1;
            }
        }

        let catalog = Catalog {
            generated_at,
            sources: self.registry.into_sources(),
            categories: Some(
                self.existing_categories
                    .or(input_categories)
                    .unwrap_or_else(|| json!([])),
            ),
            tools: self.merged,
            comparisons: Some(
                self.existing_comparisons
                    .or(input_comparisons)
                    .unwrap_or_else(default_comparisons),
            ),
        };

        (catalog, self.stats)
    }
}

/// Right-biased merge: every non-empty field of `incoming` replaces the one
/// on `base`; empty fields keep the prior value. `updatedAt` is always set to
/// `today`.
fn merge_into(base: &mut Tool, incoming: Tool, today: String) {
    let Tool {
        id,
        name,
        slug,
        logo_url,
        website_url,
        pricing_url,
        trial_url,
        category_ids,
        tags,
        price_model,
        price_plans,
        features,
        platforms,
        audiences,
        updated_at: _,
        source_ids,
        status,
        extra,
    } = incoming;

    overwrite(&mut base.id, id);
    overwrite(&mut base.name, name);
    overwrite(&mut base.slug, slug);
    overwrite(&mut base.logo_url, logo_url);
    overwrite(&mut base.website_url, website_url);
    overwrite(&mut base.pricing_url, pricing_url);
    overwrite(&mut base.trial_url, trial_url);
    overwrite(&mut base.category_ids, category_ids);
    overwrite(&mut base.tags, tags);
    overwrite(&mut base.price_model, price_model);
    overwrite(&mut base.price_plans, price_plans);
    overwrite(&mut base.features, features);
    overwrite(&mut base.platforms, platforms);
    overwrite(&mut base.audiences, audiences);
    overwrite(&mut base.source_ids, source_ids);
    overwrite(&mut base.status, status);
    base.extra.extend(extra);
    base.updated_at = today;
}

/// Values that can be "empty" for merge purposes.
trait MergeValue {
    fn is_blank(&self) -> bool;
}

impl MergeValue for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T> MergeValue for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

fn overwrite<T: MergeValue>(slot: &mut T, value: T) {
    if !value.is_blank() {
        *slot = value;
    }
}
