//! Statistics generation from the results database
//!
//! This module provides functionality for extracting and displaying
//! statistics from the storage layer.

use crate::links::extract_host;
use crate::output::OutputResult;
use crate::storage::{RunRecord, Storage};
use std::collections::BTreeMap;

/// Results database statistics
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    /// Number of stored results
    pub total_results: u64,

    /// Number of runs, whatever their outcome
    pub total_runs: u64,

    /// Results stored without a snippet
    pub empty_snippets: u64,

    /// Result count per host, sorted by host
    pub results_by_host: BTreeMap<String, u64>,

    /// The most recent run
    pub latest_run: Option<RunRecord>,
}

impl SearchStatistics {
    /// Percentage of stored results that carry a snippet
    pub fn snippet_coverage(&self) -> f64 {
        if self.total_results == 0 {
            return 0.0;
        }
        let with_snippet = self.total_results - self.empty_snippets;
        (with_snippet as f64 / self.total_results as f64) * 100.0
    }
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> OutputResult<SearchStatistics> {
    let mut results_by_host = BTreeMap::new();
    for result in storage.get_results()? {
        let host = extract_host(&result.link).unwrap_or_else(|| "(unknown)".to_string());
        *results_by_host.entry(host).or_insert(0) += 1;
    }

    Ok(SearchStatistics {
        total_results: storage.count_results()?,
        total_runs: storage.count_runs()?,
        empty_snippets: storage.count_empty_snippets()?,
        results_by_host,
        latest_run: storage.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &SearchStatistics) {
    println!("=== Search Statistics ===\n");

    println!("Overview:");
    println!("  Stored results: {}", stats.total_results);
    println!("  Runs: {}", stats.total_runs);
    println!(
        "  Snippet coverage: {:.1}% ({} without snippet)",
        stats.snippet_coverage(),
        stats.empty_snippets
    );
    println!();

    if let Some(run) = &stats.latest_run {
        println!("Latest Run:");
        println!("  ID: {}", run.id);
        println!("  Started: {}", run.started_at);
        if let Some(finished) = &run.finished_at {
            println!("  Finished: {}", finished);
        }
        println!("  Status: {}", run.status.to_db_string());
        println!("  Results: {}", run.result_count);
        if let Some(error) = &run.error_message {
            println!("  Error: {}", error);
        }
        println!();
    }

    if !stats.results_by_host.is_empty() {
        println!("Results by Host ({}):", stats.results_by_host.len());
        let mut hosts: Vec<_> = stats.results_by_host.iter().collect();
        hosts.sort_by(|a, b| b.1.cmp(a.1));
        for (host, count) in hosts {
            println!("  - {}: {}", host, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchResult;
    use crate::storage::SqliteStorage;

    #[test]
    fn test_statistics_from_storage() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("q", "hash").unwrap();
        storage
            .save_results(
                run_id,
                "q",
                &[
                    SearchResult {
                        rank: 1,
                        title: "A".to_string(),
                        link: "https://jobs.lever.co/a/1".to_string(),
                        snippet: "remote".to_string(),
                    },
                    SearchResult {
                        rank: 2,
                        title: "B".to_string(),
                        link: "https://jobs.lever.co/b/2".to_string(),
                        snippet: String::new(),
                    },
                ],
            )
            .unwrap();
        storage.complete_run(run_id, 2).unwrap();

        let stats = load_statistics(&storage).unwrap();

        assert_eq!(stats.total_results, 2);
        assert_eq!(stats.total_runs, 1);
        assert_eq!(stats.empty_snippets, 1);
        assert_eq!(stats.results_by_host.get("jobs.lever.co"), Some(&2));
        assert!((stats.snippet_coverage() - 50.0).abs() < f64::EPSILON);
        assert_eq!(stats.latest_run.map(|r| r.result_count), Some(2));
    }

    #[test]
    fn test_empty_database() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let stats = load_statistics(&storage).unwrap();

        assert_eq!(stats.total_results, 0);
        assert!(stats.latest_run.is_none());
        assert_eq!(stats.snippet_coverage(), 0.0);
    }
}
