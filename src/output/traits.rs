//! Output traits and error types
//!
//! This module defines the sink interface records are pushed through and the
//! errors output operations can produce.

use crate::extract::AgentRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for extracted agent records
///
/// Implementations must be usable from concurrent crawl tasks. A push is
/// final: the caller counts the record as emitted whether or not the push
/// succeeds.
pub trait RecordSink: Send + Sync {
    /// Appends one record
    fn push_record(&self, record: &AgentRecord) -> OutputResult<()>;
}
