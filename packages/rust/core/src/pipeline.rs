//! End-to-end catalog run: input → normalize → (enrich) → merge → catalog file.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use toolcatalog_crawler::PageFetcher;
use toolcatalog_shared::{Catalog, EnrichSettings, FetchConfig, Result};

use crate::enrich::enrich_tool;
use crate::merge::{CatalogMerger, MergeStats};
use crate::normalize::normalize_tool;
use crate::store;

/// Configuration for one catalog run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Curated input document.
    pub input: PathBuf,
    /// Catalog file; read as the existing catalog, then overwritten.
    pub output: PathBuf,
    /// Fetch settings. `None` disables network enrichment.
    pub fetch: Option<FetchConfig>,
    /// Caps for inferred lists.
    pub enrich: EnrichSettings,
    /// Build the catalog but do not write it.
    pub dry_run: bool,
}

/// Result of a catalog run.
#[derive(Debug)]
pub struct RunSummary {
    /// The catalog as written (or as it would have been written).
    pub catalog: Catalog,
    /// Number of input tools processed.
    pub tools_processed: usize,
    pub stats: MergeStats,
    /// Output path, unless this was a dry run.
    pub written_to: Option<PathBuf>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each input tool has been merged.
    fn tool_processed(&self, name: &str, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, summary: &RunSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn tool_processed(&self, _name: &str, _current: usize, _total: usize) {}
    fn done(&self, _summary: &RunSummary) {}
}

/// Run the full pipeline with the current time as the run clock.
pub async fn run_catalog(
    config: &RunConfig,
    progress: &dyn ProgressReporter,
) -> Result<RunSummary> {
    run_catalog_at(config, progress, Utc::now()).await
}

/// Run the full pipeline with an explicit run clock.
///
/// 1. Read the input document and the existing catalog
/// 2. Normalize every input tool, enriching it when fetch is enabled
/// 3. Merge each candidate, in input order
/// 4. Write the catalog atomically (skipped on dry run)
#[instrument(skip_all, fields(input = %config.input.display(), output = %config.output.display()))]
pub async fn run_catalog_at(
    config: &RunConfig,
    progress: &dyn ProgressReporter,
    now: DateTime<Utc>,
) -> Result<RunSummary> {
    let start = Instant::now();

    // --- Phase 1: Load ---
    progress.phase("Loading input");
    let input = store::read_input(&config.input)?;
    let existing = store::read_catalog(&config.output)?;

    let fetcher = config.fetch.as_ref().map(PageFetcher::new).transpose()?;

    let total = input.tools.len();
    info!(
        tools = total,
        existing = existing.tools.len(),
        fetch = fetcher.is_some(),
        dry_run = config.dry_run,
        "starting catalog run"
    );

    // --- Phase 2: Normalize, enrich, merge ---
    progress.phase(if fetcher.is_some() {
        "Enriching tools"
    } else {
        "Merging tools"
    });

    let mut merger = CatalogMerger::new(existing, now);
    for (idx, raw) in input.tools.into_iter().enumerate() {
        let mut tool = normalize_tool(raw);
        if let Some(fetcher) = &fetcher {
            tool = enrich_tool(tool, fetcher, &config.enrich).await;
        }
        let name = tool.name.clone();
        merger.absorb(tool);
        progress.tool_processed(&name, idx + 1, total);
    }

    let (catalog, stats) = merger.finish(input.categories, input.comparisons);
    info!(
        created = stats.created,
        updated = stats.updated,
        retained = stats.retained,
        sources_added = stats.sources_added,
        "tools merged"
    );

    // --- Phase 3: Write ---
    let written_to = if config.dry_run {
        None
    } else {
        progress.phase("Writing catalog");
        store::write_catalog(&config.output, &catalog)?;
        Some(config.output.clone())
    };

    let summary = RunSummary {
        catalog,
        tools_processed: total,
        stats,
        written_to,
        elapsed: start.elapsed(),
    };

    info!(elapsed_ms = summary.elapsed.as_millis() as u64, "catalog run complete");
    progress.done(&summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;

    use chrono::TimeZone;
    use serde_json::{Value, json};
    use toolcatalog_shared::CatalogError;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn temp_dir() -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("toolcatalog-pipeline-{}", uuid::Uuid::now_v7()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 2, 12, 0, 0).unwrap()
    }

    fn config(dir: &std::path::Path) -> RunConfig {
        RunConfig {
            input: dir.join("input.json"),
            output: dir.join("catalog.json"),
            fetch: None,
            enrich: EnrichSettings::default(),
            dry_run: false,
        }
    }

    fn read_json(path: &std::path::Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    /// Records every callback for assertions.
    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str) {
            self.events.lock().unwrap().push(format!("phase:{name}"));
        }
        fn tool_processed(&self, name: &str, current: usize, total: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("tool:{name}:{current}/{total}"));
        }
        fn done(&self, summary: &RunSummary) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done:{}", summary.tools_processed));
        }
    }

    #[tokio::test]
    async fn end_to_end_without_fetch() {
        let dir = temp_dir();
        let cfg = config(&dir);
        fs::write(
            &cfg.input,
            r#"{"tools":[{"name":"Foo Tool","websiteUrl":"https://foo.com"}]}"#,
        )
        .unwrap();

        let progress = RecordingProgress::default();
        let summary = run_catalog_at(&cfg, &progress, now()).await.unwrap();
        assert_eq!(summary.written_to.as_deref(), Some(cfg.output.as_path()));
        assert_eq!(summary.tools_processed, 1);
        assert_eq!(summary.stats.created, 1);

        let written = read_json(&cfg.output);
        assert_eq!(written["generatedAt"], "2026-05-02T12:00:00Z");
        assert_eq!(
            written["sources"],
            json!([{"id":"s_foo-com","name":"Foo Tool","url":"https://foo.com","type":"official"}])
        );
        assert_eq!(written["categories"], json!([]));
        assert_eq!(written["comparisons"], json!({"fields": []}));

        let tools = written["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["slug"], "foo-tool");
        assert_eq!(tools[0]["id"], "t_foo-tool");
        assert_eq!(tools[0]["sourceIds"], json!(["s_foo-com"]));
        assert_eq!(tools[0]["updatedAt"], "2026-05-02");
        assert_eq!(tools[0]["status"], "active");

        let events = progress.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "phase:Loading input",
                "phase:Merging tools",
                "tool:Foo Tool:1/1",
                "phase:Writing catalog",
                "done:1",
            ]
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn dry_run_writes_nothing() {
        let dir = temp_dir();
        let cfg = RunConfig {
            dry_run: true,
            ..config(&dir)
        };
        fs::write(&cfg.input, r#"{"tools":[{"name":"Foo"}]}"#).unwrap();

        let summary = run_catalog_at(&cfg, &SilentProgress, now()).await.unwrap();
        assert!(summary.written_to.is_none());
        assert_eq!(summary.catalog.tools.len(), 1);
        assert!(!cfg.output.exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn rerun_updates_and_retains() {
        let dir = temp_dir();
        let cfg = config(&dir);
        fs::write(
            &cfg.output,
            r#"{
              "generatedAt": "2025-01-01T00:00:00Z",
              "sources": [],
              "categories": [{"id": "dev"}],
              "tools": [
                {"id":"t_legacy-tool","name":"Legacy Tool","slug":"legacy-tool","updatedAt":"2024-06-01","rating":3},
                {"id":"t_old","name":"Old","slug":"old","tags":["x"],"priceModel":"free"}
              ],
              "comparisons": {"fields": ["priceModel"]}
            }"#,
        )
        .unwrap();
        fs::write(
            &cfg.input,
            r#"{"tools":[{"slug":"old","tags":["y","z"]}],"categories":[{"id":"ignored"}]}"#,
        )
        .unwrap();

        let summary = run_catalog_at(&cfg, &SilentProgress, now()).await.unwrap();
        assert_eq!(summary.stats.updated, 1);
        assert_eq!(summary.stats.retained, 1);

        let written = read_json(&cfg.output);
        assert_eq!(written["categories"], json!([{"id": "dev"}]));
        assert_eq!(written["comparisons"], json!({"fields": ["priceModel"]}));

        let tools = written["tools"].as_array().unwrap();
        assert_eq!(tools[0]["slug"], "old");
        assert_eq!(tools[0]["name"], "Old");
        assert_eq!(tools[0]["tags"], json!(["y", "z"]));
        assert_eq!(tools[0]["priceModel"], "free");
        assert_eq!(tools[1]["slug"], "legacy-tool");
        assert_eq!(tools[1]["updatedAt"], "2024-06-01");
        assert_eq!(tools[1]["rating"], 3);

        fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn loose_existing_catalog_is_carried_over() {
        let dir = temp_dir();
        let cfg = config(&dir);
        fs::write(
            &cfg.output,
            r#"{
              "sources": [
                {"id": "s_legacy-io", "url": "https://legacy.io", "license": "MIT"},
                {"name": "No id at all"}
              ],
              "tools": [
                {"name": "Legacy", "slug": "legacy", "logoUrl": null, "tags": null, "sourceIds": ["s_legacy-io"]}
              ]
            }"#,
        )
        .unwrap();
        fs::write(
            &cfg.input,
            r#"{"tools":[{"name":"Fresh","websiteUrl":"https://fresh.dev"}]}"#,
        )
        .unwrap();

        let summary = run_catalog_at(&cfg, &SilentProgress, now()).await.unwrap();
        assert_eq!(summary.stats.created, 1);
        assert_eq!(summary.stats.retained, 1);

        let written = read_json(&cfg.output);
        assert_eq!(
            written["sources"],
            json!([
                {"id": "s_legacy-io", "name": "", "url": "https://legacy.io", "type": "", "license": "MIT"},
                {"id": "s_fresh-dev", "name": "Fresh", "url": "https://fresh.dev", "type": "official"}
            ])
        );
        let legacy = &written["tools"][1];
        assert_eq!(legacy["slug"], "legacy");
        assert_eq!(legacy["logoUrl"], "");
        assert_eq!(legacy["tags"], json!([]));
        assert_eq!(legacy["sourceIds"], json!(["s_legacy-io"]));

        fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn missing_input_aborts_without_writing() {
        let dir = temp_dir();
        let cfg = config(&dir);

        let err = run_catalog_at(&cfg, &SilentProgress, now()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(!cfg.output.exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn corrupt_catalog_aborts() {
        let dir = temp_dir();
        let cfg = config(&dir);
        fs::write(&cfg.input, r#"{"tools":[]}"#).unwrap();
        fs::write(&cfg.output, "[1, 2").unwrap();

        let err = run_catalog_at(&cfg, &SilentProgress, now()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
        assert_eq!(fs::read_to_string(&cfg.output).unwrap(), "[1, 2");

        fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn fetch_enriches_from_live_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"<html><head><title>Widgetly | Home</title>
                   <meta name="description" content="Drag and drop, Live preview">
                   <meta name="keywords" content="widgets, no-code"></head>
                   <body><h1></h1>Desktop app for Mac</body></html>"#,
                "text/html; charset=utf-8",
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/pricing"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("Enterprise plans: contact sales", "text/html"),
            )
            .mount(&server)
            .await;

        let dir = temp_dir();
        let cfg = RunConfig {
            fetch: Some(FetchConfig::default().with_timeout_secs(5)),
            ..config(&dir)
        };
        let input = json!({"tools": [{
            "websiteUrl": format!("{}/", server.uri()),
            "pricingUrl": format!("{}/pricing", server.uri()),
        }]});
        fs::write(&cfg.input, input.to_string()).unwrap();

        let summary = run_catalog_at(&cfg, &SilentProgress, now()).await.unwrap();
        let tool = &summary.catalog.tools[0];

        assert_eq!(tool.name, "Widgetly");
        assert_eq!(tool.slug, "widgetly");
        assert_eq!(tool.id, "t_widgetly");
        assert_eq!(tool.features, vec!["Drag and drop", "Live preview"]);
        assert_eq!(tool.tags, vec!["widgets", "no-code"]);
        assert_eq!(tool.price_model, "enterprise");
        assert_eq!(tool.platforms, vec!["web", "desktop"]);
        assert_eq!(tool.source_ids.len(), 1);
        assert_eq!(summary.catalog.sources[0].name, "Widgetly");

        fs::remove_dir_all(&dir).ok();
    }
}
