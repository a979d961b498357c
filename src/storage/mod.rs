//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler:
//! - SQLite database initialization and schema management
//! - Run tracking (start, completion, final counters)
//! - The append-only agent dataset

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::extract::AgentRecord;

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub records_emitted: u64,
    pub requests_processed: u64,
}

/// An agent record as stored in the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAgent {
    pub id: i64,
    pub run_id: i64,
    pub record: AgentRecord,
    pub scraped_at: String,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_roundtrip() {
        for status in &[RunStatus::Running, RunStatus::Completed] {
            let db_str = status.to_db_string();
            assert_eq!(Some(*status), RunStatus::from_db_string(db_str));
        }
    }

    #[test]
    fn test_run_status_invalid() {
        assert_eq!(RunStatus::from_db_string("invalid"), None);
    }
}
