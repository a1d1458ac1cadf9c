//! CLI definition, tracing setup, and the catalog run command.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use toolcatalog_core::pipeline::{ProgressReporter, RunConfig, RunSummary, run_catalog};
use toolcatalog_core::store::to_json_pretty;
use toolcatalog_shared::{AppConfig, FetchConfig, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// toolcatalog: merge curated tool lists into a JSON catalog.
#[derive(Parser, Debug)]
#[command(
    name = "toolcatalog",
    version,
    about = "Enrich curated tool records from their web pages and merge them into a JSON catalog.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Input JSON with a `tools` list and optional `categories`/`comparisons`.
    #[arg(long)]
    pub input: PathBuf,

    /// Catalog file. Read as the existing catalog if present, then overwritten.
    #[arg(long)]
    pub output: PathBuf,

    /// Fetch each tool's website and pricing page to fill empty fields.
    #[arg(long)]
    pub fetch: bool,

    /// Per-request fetch timeout in seconds (overrides the config file).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Print the resulting catalog to stdout instead of writing it.
    #[arg(long)]
    pub dry_run: bool,

    /// Config file (defaults to ~/.toolcatalog/toolcatalog.toml).
    #[arg(long, env = "TOOLCATALOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "toolcatalog=info",
        1 => "toolcatalog=debug",
        _ => "toolcatalog=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Resolve configuration and run the catalog pipeline.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let app_config = match &cli.config {
        Some(path) => load_config_from(path)
            .wrap_err_with(|| format!("loading config {}", path.display()))?,
        None => load_config()?,
    };
    debug!(?app_config, "configuration resolved");

    let run_config = build_run_config(&cli, &app_config);
    let reporter = CliProgress::new();

    let summary = run_catalog(&run_config, &reporter)
        .await
        .wrap_err("catalog run failed")?;

    if run_config.dry_run {
        println!("{}", to_json_pretty(&summary.catalog)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

/// Merge CLI flags over the config file.
fn build_run_config(cli: &Cli, app_config: &AppConfig) -> RunConfig {
    let fetch = cli.fetch.then(|| {
        let fetch = FetchConfig::from(app_config);
        match cli.timeout {
            Some(secs) => fetch.with_timeout_secs(secs),
            None => fetch,
        }
    });

    RunConfig {
        input: cli.input.clone(),
        output: cli.output.clone(),
        fetch,
        enrich: app_config.enrich.clone(),
        dry_run: cli.dry_run,
    }
}

fn print_summary(summary: &RunSummary) {
    let stats = &summary.stats;
    eprintln!();
    eprintln!("  Catalog updated.");
    if let Some(path) = &summary.written_to {
        eprintln!("  Path:      {}", path.display());
    }
    eprintln!("  Processed: {}", summary.tools_processed);
    eprintln!(
        "  Tools:     {} created, {} updated, {} retained",
        stats.created, stats.updated, stats.retained
    );
    eprintln!("  Sources:   {} added, {} total", stats.sources_added, summary.catalog.sources.len());
    eprintln!("  Time:      {:.1}s", summary.elapsed.as_secs_f64());
    eprintln!();
    info!(tools = summary.catalog.tools.len(), "done");
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn tool_processed(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Merged [{current}/{total}] {name}"));
    }

    fn done(&self, _summary: &RunSummary) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        // A failed run never reaches `done`.
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
