//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::extract::AgentRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus, StoredAgent};
use crate::ScoutError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const RUN_COLUMNS: &str =
    "id, started_at, finished_at, config_hash, status, records_emitted, requests_processed";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Database opened, schema in place
    /// * `Err(ScoutError)` - The file cannot be opened or the schema cannot be
    ///   created
    pub fn new(path: &Path) -> Result<Self, ScoutError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, ScoutError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
        records_emitted: row.get::<_, i64>(5)? as u64,
        requests_processed: row.get::<_, i64>(6)? as u64,
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
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
                run_from_row,
            )
            .optional()?;

        Ok(run)
    }

    fn list_runs(&self) -> StorageResult<Vec<RunRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM runs ORDER BY id DESC", RUN_COLUMNS))?;

        let runs = stmt
            .query_map([], run_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(runs)
    }

    fn complete_run(
        &mut self,
        run_id: i64,
        records_emitted: u64,
        requests_processed: u64,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, records_emitted = ?3,
             requests_processed = ?4 WHERE id = ?5",
            params![
                RunStatus::Completed.to_db_string(),
                now,
                records_emitted as i64,
                requests_processed as i64,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Agent Dataset =====

    fn insert_agent(&mut self, run_id: i64, record: &AgentRecord) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO agents (run_id, name, email, phone, agency, profile_url, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run_id,
                record.name,
                record.email,
                record.phone,
                record.agency,
                record.profile_url,
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_agents(&self, run_id: i64) -> StorageResult<Vec<StoredAgent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, name, email, phone, agency, profile_url, scraped_at
             FROM agents WHERE run_id = ?1 ORDER BY id",
        )?;

        let agents = stmt
            .query_map(params![run_id], |row| {
                Ok(StoredAgent {
                    id: row.get(0)?,
                    run_id: row.get(1)?,
                    record: AgentRecord {
                        name: row.get(2)?,
                        email: row.get(3)?,
                        phone: row.get(4)?,
                        agency: row.get(5)?,
                        profile_url: row.get(6)?,
                    },
                    scraped_at: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(agents)
    }

    fn count_agents(&self, run_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM agents WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
