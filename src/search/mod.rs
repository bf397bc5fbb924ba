//! Search module: fetching the results page and extracting results
//!
//! This module contains the core logic of a run:
//! - HTTP fetching of the single results page
//! - Result card extraction with strategy fallback
//! - The run itself, which ties fetching, extraction and storage together

mod extractor;
mod fetcher;

pub use extractor::{
    extract, extract_results, CardStrategy, Extraction, ParseWarning, SearchResult,
    SNIPPET_CLASSES,
};
pub use fetcher::{build_http_client, fetch_results_page, TransportError};

use crate::config::{validate, Config};
use crate::storage::{open_storage, Storage};
use reqwest::Client;
use std::path::Path;

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: i64,

    /// Strategy that located the cards, if any
    pub strategy: Option<CardStrategy>,

    /// Records extracted from the page
    pub results: Vec<SearchResult>,

    /// Cards skipped during extraction
    pub skipped: usize,

    /// Distinct rows written to storage; a link repeated on the page counts once
    pub saved: usize,
}

/// Runs one complete search
///
/// This is the main entry point. It will:
/// 1. Open the database and record a new run
/// 2. Build the HTTP client and fetch the results page
/// 3. Extract ranked results
/// 4. Persist them and close the run
///
/// An invalid configuration is rejected before any run is recorded. A
/// transport failure marks the run failed and is returned to the caller.
/// Finding no results is not a failure.
///
/// # Arguments
///
/// * `config` - The scout configuration
/// * `config_hash` - Hash recorded with the run
pub async fn run_search(config: &Config, config_hash: &str) -> crate::Result<RunOutcome> {
    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let client = build_http_client(&config.http)?;
    run_search_with(&mut storage, &client, config, config_hash).await
}

/// Runs one search against the given storage and client
pub async fn run_search_with(
    storage: &mut dyn Storage,
    client: &Client,
    config: &Config,
    config_hash: &str,
) -> crate::Result<RunOutcome> {
    validate(config)?;

    let query = config.search.query.as_str();
    let run_id = storage.create_run(query, config_hash)?;
    tracing::info!("Starting run {} for query: {}", run_id, query);

    let html = match fetch_results_page(client, &config.search).await {
        Ok(html) => html,
        Err(e) => {
            tracing::error!("Run {} failed: {}", run_id, e);
            storage.fail_run(run_id, &e.to_string())?;
            return Err(e.into());
        }
    };

    let extraction = extract(&html);
    match extraction.strategy {
        Some(strategy) => tracing::info!(
            "Found {} cards via {:?}, {} usable",
            extraction.cards_found(),
            strategy,
            extraction.results.len()
        ),
        None => tracing::warn!("No result cards found on the page"),
    }

    let saved = storage.save_results(run_id, query, &extraction.results)?;
    storage.complete_run(run_id, saved as u32)?;
    tracing::info!("Saved {} results from the first page", saved);

    Ok(RunOutcome {
        run_id,
        strategy: extraction.strategy,
        skipped: extraction.warnings.len(),
        results: extraction.results,
        saved,
    })
}
