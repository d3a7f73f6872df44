//! Scroll-Harvest main entry point
//!
//! This is the command-line interface for the Scroll-Harvest blog catalog harvester.

use anyhow::Context;
use clap::Parser;
use scroll_harvest::config::{load_config_with_hash, validate, Config};
use scroll_harvest::crawler::{harvest, ScrollRequest};
use scroll_harvest::output::{
    compute_statistics, generate_markdown_index, load_catalog, print_statistics,
};
use scroll_harvest::state::Cursor;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Scroll-Harvest: an infinite-scroll blog catalog harvester
///
/// Scroll-Harvest walks a blog's AJAX infinite-scroll endpoint page by page
/// and keeps a deduplicated, date-sorted JSON catalog of every article it
/// finds. The catalog is rewritten after each page.
#[derive(Parser, Debug)]
#[command(name = "scroll-harvest")]
#[command(version)]
#[command(about = "An infinite-scroll blog catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults target the jOOQ blog)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the catalog output path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Override the maximum number of pages to request
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Show the effective configuration and the first request without fetching
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show statistics for an existing catalog file and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    stats: bool,

    /// Write a markdown index of an existing catalog file and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(cli.config.as_deref())?;
    if let Some(output) = &cli.output {
        config.output.catalog_path = output.to_string_lossy().to_string();
    }
    if let Some(max_pages) = cli.max_pages {
        config.harvest.max_pages = max_pages;
    }
    validate(&config).context("Invalid command-line overrides")?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config)?;
    } else {
        return handle_harvest(config).await;
    }

    Ok(ExitCode::SUCCESS)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scroll_harvest=info,warn"),
            1 => EnvFilter::new("scroll_harvest=debug,info"),
            2 => EnvFilter::new("scroll_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles the --dry-run mode: shows what the first request would look like
fn handle_dry_run(config: &Config) {
    println!("=== Scroll-Harvest Dry Run ===\n");

    println!("Source:");
    println!("  Endpoint: {}", config.source.endpoint);
    println!("  User agent: {}", config.source.user_agent);
    println!("  Posts per page: {}", config.source.posts_per_page);

    println!("\nHarvest:");
    println!("  Max pages: {}", config.harvest.max_pages);
    println!("  Page delay: {}ms", config.harvest.page_delay_ms);
    println!("  Backoff unit: {}ms", config.harvest.backoff_base_ms);
    println!("  Backoff ceiling: {}ms", config.harvest.backoff_max_ms);
    if config.harvest.max_retries == 0 {
        println!("  Max retries per page: unlimited");
    } else {
        println!("  Max retries per page: {}", config.harvest.max_retries);
    }

    println!("\nOutput:");
    println!("  Catalog: {}", config.output.catalog_path);
    println!("  Summary: {}", config.output.summary_path);

    let request = ScrollRequest::from_cursor(&Cursor::initial(&config.source), &config.source);
    println!("\nFirst request (POST {}):", request.endpoint);
    for (name, value) in &request.fields {
        println!("  {} = {}", name, value);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics for the catalog file
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = Path::new(&config.output.catalog_path);
    println!("Catalog: {}\n", path.display());

    let articles = load_catalog(path)?;
    print_statistics(&compute_statistics(&articles), 20);

    Ok(())
}

/// Handles the --export-summary mode: writes the markdown index
fn handle_export_summary(config: &Config) -> anyhow::Result<()> {
    let catalog_path = Path::new(&config.output.catalog_path);
    let summary_path = Path::new(&config.output.summary_path);

    println!("=== Exporting Catalog Index ===\n");
    println!("Catalog: {}", catalog_path.display());
    println!("Output: {}", summary_path.display());
    println!();

    tracing::info!("Loading catalog...");
    let articles = load_catalog(catalog_path)?;

    tracing::info!("Generating markdown index for {} articles...", articles.len());
    generate_markdown_index(&articles, summary_path)?;

    println!("✓ Index exported to: {}", summary_path.display());

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> anyhow::Result<ExitCode> {
    tracing::info!(
        "Harvesting {} (up to {} pages)",
        config.source.endpoint,
        config.harvest.max_pages
    );

    let report = match harvest(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    let output_path = std::fs::canonicalize(&report.output_path)
        .unwrap_or_else(|_| report.output_path.clone());

    println!();
    println!("Stopped: {}", report.reason.describe());
    println!("Pages processed: {}", report.pages_processed);
    println!("Total unique articles: {}", report.total_articles);
    if report.persist_count > 0 {
        println!("Saved to {}", output_path.display());
    } else {
        println!("Nothing saved ({} was not written)", output_path.display());
    }

    if report.reason.is_expected() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}
