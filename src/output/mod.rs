//! Output module for emitted records and crawl reports
//!
//! This module handles:
//! - The record sink the profile handler pushes into
//! - Exporting the dataset as JSON
//! - Printing per-run statistics

mod dataset;
pub mod json;
pub mod stats;
mod traits;

pub use dataset::DatasetSink;
pub use json::{export_latest_run, export_run, records_to_json};
pub use stats::{load_statistics, print_statistics, RunStatistics};
pub use traits::{OutputError, OutputResult, RecordSink};
