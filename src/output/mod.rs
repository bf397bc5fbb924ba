//! Output module for reporting on stored results
//!
//! This module handles:
//! - Statistics over the results database
//! - Markdown export of stored results

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_results, write_markdown_results};
pub use stats::{load_statistics, print_statistics, SearchStatistics};

use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
