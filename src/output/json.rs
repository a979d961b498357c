//! JSON export of the agent dataset

use crate::extract::AgentRecord;
use crate::output::traits::{OutputError, OutputResult};
use crate::storage::Storage;
use std::fs;
use std::path::Path;

/// Serializes records as a pretty-printed JSON array
pub fn records_to_json(records: &[AgentRecord]) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Writes the records of `run_id` to `path`
///
/// Returns the number of records written.
pub fn export_run(storage: &dyn Storage, run_id: i64, path: &Path) -> OutputResult<usize> {
    let records: Vec<AgentRecord> = storage
        .list_agents(run_id)
        .map_err(|e| OutputError::Storage(e.to_string()))?
        .into_iter()
        .map(|stored| stored.record)
        .collect();

    fs::write(path, records_to_json(&records)?)?;
    Ok(records.len())
}

/// Writes the records of the most recent run to `path`
///
/// Returns the run ID and the number of records written, or `None` when the
/// database holds no runs.
pub fn export_latest_run(storage: &dyn Storage, path: &Path) -> OutputResult<Option<(i64, usize)>> {
    let Some(run) = storage
        .get_latest_run()
        .map_err(|e| OutputError::Storage(e.to_string()))?
    else {
        return Ok(None);
    };

    let written = export_run(storage, run.id, path)?;
    Ok(Some((run.id, written)))
}
