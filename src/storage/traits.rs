//! Storage traits and error types

use crate::extract::AgentRecord;
use crate::storage::{RunRecord, StoredAgent};
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
///
/// Covers the run lifecycle and the append-only agent dataset.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run with status `running`
    ///
    /// Returns the ID of the newly created run.
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Lists all runs, newest first
    fn list_runs(&self) -> StorageResult<Vec<RunRecord>>;

    /// Marks a run as completed and stores its final counters
    fn complete_run(
        &mut self,
        run_id: i64,
        records_emitted: u64,
        requests_processed: u64,
    ) -> StorageResult<()>;

    // ===== Agent Dataset =====

    /// Appends one agent record to a run's dataset
    fn insert_agent(&mut self, run_id: i64, record: &AgentRecord) -> StorageResult<i64>;

    /// All records of a run, in insertion order
    fn list_agents(&self, run_id: i64) -> StorageResult<Vec<StoredAgent>>;

    /// Number of records stored for a run
    fn count_agents(&self, run_id: i64) -> StorageResult<u64>;
}
