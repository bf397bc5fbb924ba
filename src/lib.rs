//! Serp-Scout: a single-page search results harvester
//!
//! This crate fetches one search-engine results page for a configured Boolean
//! query, extracts ranked result entries from the returned markup and persists
//! them to SQLite for later consumption.

pub mod config;
pub mod links;
pub mod output;
pub mod search;
pub mod storage;

use thiserror::Error;

/// Main error type for Serp-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] search::TransportError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Serp-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

// Re-export commonly used types
pub use config::Config;
pub use search::{extract_results, run_search, SearchResult};
