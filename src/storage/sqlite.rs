//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::search::SearchResult;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus, StoredResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const RUN_COLUMNS: &str =
    "id, started_at, finished_at, config_hash, query, status, result_count, error_message";

const RESULT_COLUMNS: &str = "link, rank, title, snippet, query, fetched_at, run_id";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path` and ensures the schema exists
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn count(&self, sql: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn query_results(
        &self,
        sql: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> StorageResult<Vec<StoredResult>> {
        let mut stmt = self.conn.prepare(sql)?;
        let results = stmt
            .query_map(args, row_to_result)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(results)
    }
}

fn row_to_run(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        query: row.get(4)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(5)?).unwrap_or(RunStatus::Failed),
        result_count: row.get(6)?,
        error_message: row.get(7)?,
    })
}

fn row_to_result(row: &Row<'_>) -> rusqlite::Result<StoredResult> {
    Ok(StoredResult {
        link: row.get(0)?,
        rank: row.get(1)?,
        title: row.get(2)?,
        snippet: row.get(3)?,
        query: row.get(4)?,
        fetched_at: row.get(5)?,
        run_id: row.get(6)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, query: &str, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, query, status) VALUES (?1, ?2, ?3, ?4)",
            params![now, config_hash, query, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                row_to_run,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                row_to_run,
            )
            .optional()?;
        Ok(run)
    }

    fn complete_run(&mut self, run_id: i64, result_count: u32) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, result_count = ?3 WHERE id = ?4",
            params![
                RunStatus::Completed.to_db_string(),
                now,
                result_count,
                run_id
            ],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn fail_run(&mut self, run_id: i64, error_message: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, error_message = ?3 WHERE id = ?4",
            params![RunStatus::Failed.to_db_string(), now, error_message, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Results =====

    fn save_results(
        &mut self,
        run_id: i64,
        query: &str,
        results: &[SearchResult],
    ) -> StorageResult<usize> {
        let fetched_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        let mut written = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO results (link, rank, title, snippet, query, fetched_at, run_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(link) DO UPDATE SET
                    rank = excluded.rank,
                    title = excluded.title,
                    snippet = excluded.snippet,
                    query = excluded.query,
                    fetched_at = excluded.fetched_at,
                    run_id = excluded.run_id
                 WHERE results.run_id != excluded.run_id",
            )?;

            // A link repeated within the run keeps its first, best-ranked row
            for result in results {
                written += stmt.execute(params![
                    result.link,
                    result.rank,
                    result.title,
                    result.snippet,
                    query,
                    fetched_at,
                    run_id
                ])?;
            }
        }

        tx.commit()?;
        Ok(written)
    }

    fn get_results(&self) -> StorageResult<Vec<StoredResult>> {
        self.query_results(
            &format!("SELECT {} FROM results ORDER BY rank ASC, link ASC", RESULT_COLUMNS),
            params![],
        )
    }

    fn get_results_for_run(&self, run_id: i64) -> StorageResult<Vec<StoredResult>> {
        self.query_results(
            &format!(
                "SELECT {} FROM results WHERE run_id = ?1 ORDER BY rank ASC",
                RESULT_COLUMNS
            ),
            params![run_id],
        )
    }

    // ===== Statistics =====

    fn count_results(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM results")
    }

    fn count_empty_snippets(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM results WHERE snippet = ''")
    }

    fn count_runs(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM runs")
    }
}
