//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::search::SearchResult;
use crate::storage::{RunRecord, StoredResult};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new run in the `running` state
    ///
    /// # Arguments
    ///
    /// * `query` - The query string the run searches for
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, query: &str, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run as completed with its result count and a finish timestamp
    fn complete_run(&mut self, run_id: i64, result_count: u32) -> StorageResult<()>;

    /// Marks a run as failed, recording why
    fn fail_run(&mut self, run_id: i64, error_message: &str) -> StorageResult<()>;

    // ===== Results =====

    /// Saves results for a run
    ///
    /// Rows are keyed by link: a link seen before is updated with the new
    /// rank, title, snippet and run. All rows are written in one transaction.
    ///
    /// # Returns
    ///
    /// The number of rows written
    fn save_results(
        &mut self,
        run_id: i64,
        query: &str,
        results: &[SearchResult],
    ) -> StorageResult<usize>;

    /// Gets all stored results ordered by rank, then link
    fn get_results(&self) -> StorageResult<Vec<StoredResult>>;

    /// Gets the results last written by the given run, ordered by rank
    fn get_results_for_run(&self, run_id: i64) -> StorageResult<Vec<StoredResult>>;

    // ===== Statistics =====

    /// Counts stored results
    fn count_results(&self) -> StorageResult<u64>;

    /// Counts stored results whose snippet is empty
    fn count_empty_snippets(&self) -> StorageResult<u64>;

    /// Counts runs, whatever their status
    fn count_runs(&self) -> StorageResult<u64>;
}
