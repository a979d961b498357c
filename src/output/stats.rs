//! Statistics generation from the crawl database
//!
//! This module provides functionality for extracting and displaying
//! per-run crawl statistics from the storage layer.

use crate::extract::{AgentRecord, NOT_AVAILABLE};
use crate::storage::{RunRecord, Storage, StorageResult};

/// Statistics for one crawl run
#[derive(Debug, Clone)]
pub struct RunStatistics {
    pub run: RunRecord,

    /// Records actually stored in the dataset
    pub agents_stored: u64,

    /// Stored records with a real value per field
    pub with_name: u64,
    pub with_email: u64,
    pub with_phone: u64,
    pub with_agency: u64,
}

impl RunStatistics {
    /// Duration of a finished run in seconds
    pub fn duration_seconds(&self) -> Option<i64> {
        let started = self
            .run
            .started_at
            .parse::<chrono::DateTime<chrono::Utc>>()
            .ok()?;
        let finished = self
            .run
            .finished_at
            .as_deref()?
            .parse::<chrono::DateTime<chrono::Utc>>()
            .ok()?;
        Some((finished - started).num_seconds())
    }
}

/// Loads statistics for every run, newest first
pub fn load_statistics(storage: &dyn Storage) -> StorageResult<Vec<RunStatistics>> {
    let mut all = Vec::new();

    for run in storage.list_runs()? {
        let agents = storage.list_agents(run.id)?;
        let found = |field: fn(&AgentRecord) -> &str| {
            agents
                .iter()
                .filter(|a| field(&a.record) != NOT_AVAILABLE)
                .count() as u64
        };

        all.push(RunStatistics {
            agents_stored: agents.len() as u64,
            with_name: found(|r| r.name.as_str()),
            with_email: found(|r| r.email.as_str()),
            with_phone: found(|r| r.phone.as_str()),
            with_agency: found(|r| r.agency.as_str()),
            run,
        });
    }

    Ok(all)
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &[RunStatistics]) {
    println!("=== Crawl Statistics ===\n");

    if stats.is_empty() {
        println!("No crawl runs recorded yet.");
        return;
    }

    for entry in stats {
        let run = &entry.run;
        println!("Run {} ({})", run.id, run.status.to_db_string());
        println!("  Started: {}", run.started_at);
        if let Some(finished) = &run.finished_at {
            println!("  Finished: {}", finished);
        }
        if let Some(secs) = entry.duration_seconds() {
            println!("  Duration: {}s", secs);
        }
        println!("  Config hash: {}", run.config_hash);
        println!("  Requests processed: {}", run.requests_processed);
        println!("  Records emitted: {}", run.records_emitted);
        println!("  Records stored: {}", entry.agents_stored);

        if entry.agents_stored > 0 {
            println!("  Field coverage:");
            for (label, count) in [
                ("name", entry.with_name),
                ("email", entry.with_email),
                ("phone", entry.with_phone),
                ("agency", entry.with_agency),
            ] {
                let percentage = (count as f64 / entry.agents_stored as f64) * 100.0;
                println!("    {}: {} ({:.1}%)", label, count, percentage);
            }
        }
        println!();
    }
}
