//! Serp-Scout main entry point
//!
//! This is the command-line interface for the Serp-Scout results harvester.

use anyhow::Context;
use clap::Parser;
use serp_scout::config::{load_config_with_hash, Config, DEFAULTS_HASH};
use serp_scout::output::{load_statistics, print_statistics, write_markdown_results};
use serp_scout::search::{extract, run_search};
use serp_scout::storage::open_storage;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Serp-Scout: a single-page search results harvester
///
/// Serp-Scout fetches one results page for a configured Boolean query,
/// extracts ranked results and stores them in SQLite.
#[derive(Parser, Debug)]
#[command(name = "serp-scout")]
#[command(version)]
#[command(about = "Harvest one page of search results into SQLite", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the request that would be sent and exit
    #[arg(long, conflicts_with_all = ["stats", "export", "from_file"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export", "from_file"])]
    stats: bool,

    /// Write stored results as markdown to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["dry_run", "stats", "from_file"])]
    export: Option<PathBuf>,

    /// Extract results from a saved HTML page instead of fetching (nothing is stored)
    #[arg(long, value_name = "PATH", conflicts_with_all = ["dry_run", "stats", "export"])]
    from_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, hash)
        }
        None => {
            tracing::info!("No configuration given, using built-in defaults");
            (Config::default(), DEFAULTS_HASH.to_string())
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(path) = &cli.export {
        handle_export(&config, path)?;
    } else if let Some(path) = &cli.from_file {
        handle_from_file(path)?;
    } else {
        handle_run(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("serp_scout=info,warn"),
            1 => EnvFilter::new("serp_scout=debug,info"),
            2 => EnvFilter::new("serp_scout=trace,debug"),
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

/// Handles --dry-run: prints the effective request
fn handle_dry_run(config: &Config) {
    println!("=== Serp-Scout Dry Run ===\n");

    println!("Request:");
    println!("  GET {}", config.search.endpoint);
    for (name, value) in config.search.query_params() {
        println!("  {} = {}", name, value);
    }

    println!("\nHeaders:");
    println!("  User-Agent: {}", config.http.user_agent);
    println!("  Accept-Language: {}", config.http.accept_language);
    println!("  Timeout: {}s", config.http.timeout_secs);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\n✓ Configuration is valid");
}

/// Handles --stats: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles --export: writes stored results as markdown
fn handle_export(config: &Config, path: &Path) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let written = write_markdown_results(&storage, path)
        .with_context(|| format!("Failed to export results to {}", path.display()))?;

    println!("✓ Exported {} results to: {}", written, path.display());
    Ok(())
}

/// Handles --from-file: extracts from a saved page and prints the records
fn handle_from_file(path: &Path) -> anyhow::Result<()> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let extraction = extract(&html);
    for result in &extraction.results {
        println!("{}. {}", result.rank, result.title);
        println!("   {}", result.link);
        if !result.snippet.is_empty() {
            println!("   {}", result.snippet);
        }
    }

    println!(
        "\n{} results ({} cards skipped)",
        extraction.results.len(),
        extraction.warnings.len()
    );
    Ok(())
}

/// Handles the default mode: fetch, extract and store
async fn handle_run(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    match run_search(config, config_hash).await {
        Ok(outcome) => {
            tracing::info!(
                "Run {} completed: {} results saved, {} cards skipped",
                outcome.run_id,
                outcome.saved,
                outcome.skipped
            );
            println!("Saved {} results from the first page.", outcome.results.len());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Search failed: {}", e);
            Err(e.into())
        }
    }
}
