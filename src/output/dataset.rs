//! SQLite-backed record sink
//!
//! Appends every pushed record to the `agents` table under the current run.

use crate::extract::AgentRecord;
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use crate::storage::Storage;
use std::sync::{Arc, Mutex};

/// Sink writing records into the dataset of one crawl run
pub struct DatasetSink {
    storage: Arc<Mutex<dyn Storage + Send>>,
    run_id: i64,
}

impl DatasetSink {
    pub fn new(storage: Arc<Mutex<dyn Storage + Send>>, run_id: i64) -> Self {
        Self { storage, run_id }
    }
}

impl RecordSink for DatasetSink {
    fn push_record(&self, record: &AgentRecord) -> OutputResult<()> {
        let mut storage = self
            .storage
            .lock()
            .map_err(|e| OutputError::Storage(format!("Failed to lock storage: {}", e)))?;

        storage
            .insert_agent(self.run_id, record)
            .map_err(|e| OutputError::Storage(e.to_string()))?;

        Ok(())
    }
}
