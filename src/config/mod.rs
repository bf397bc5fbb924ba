//! Configuration module for Serp-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file (or no file at all) reproduces the
//! built-in query and request headers.
//!
//! # Example
//!
//! ```no_run
//! use serp_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Query: {}", config.search.query);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, HttpConfig, OutputConfig, SearchConfig, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_ENDPOINT,
    DEFAULT_QUERY, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, DEFAULTS_HASH};
pub use validation::validate;
