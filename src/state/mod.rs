//! State module for tracking crawl progress
//!
//! `CrawlState` owns the process-wide counters (records emitted, requests
//! processed, profile slots in flight) and is shared by `Arc` with every
//! component that reads or mutates them.

mod crawl_state;

pub use crawl_state::{CrawlCounters, CrawlState};
