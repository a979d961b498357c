//! Crawler module for directory traversal and profile extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retries and proxy rotation
//! - The deduplicated, cap-aware request frontier
//! - Link discovery and role-based page routing
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod handlers;
mod parser;
mod request;
mod router;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_once, user_agent_string, FetchResult, Fetcher};
pub use frontier::{EnqueueOutcome, Frontier};
pub use handlers::{handle_listing, handle_profile, ListingOutcome};
pub use parser::{extract_listing_links, extract_profile_links};
pub use request::{PageRole, Request};
pub use router::{PageOutcome, Router, SiteRules};
