//! Storage module for persisting search results
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Run tracking (when a search ran, with which config, how it ended)
//! - Result persistence, keyed by link so repeated runs update in place

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use std::path::Path;

/// Initializes or opens a storage database
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// A persisted search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResult {
    pub link: String,
    pub rank: u32,
    pub title: String,
    pub snippet: String,
    pub query: String,
    pub fetched_at: String,
    pub run_id: i64,
}

/// Represents a search run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub query: String,
    pub status: RunStatus,
    pub result_count: u32,
    pub error_message: Option<String>,
}

/// Status of a search run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
