//! Page handlers
//!
//! The listing handler grows the frontier; the profile handler turns a page
//! into exactly one [`AgentRecord`] and hands it to the sink. Neither handler
//! touches `requests_processed`, which belongs to the crawl loop.

use crate::crawler::frontier::{EnqueueOutcome, Frontier};
use crate::crawler::parser::{extract_listing_links, extract_profile_links};
use crate::crawler::request::{PageRole, Request};
use crate::crawler::router::SiteRules;
use crate::extract::{extract_agent, AgentRecord};
use crate::output::RecordSink;
use crate::state::CrawlState;
use scraper::Html;
use url::Url;

/// What a listing page contributed to the frontier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingOutcome {
    /// Profile links found on the page
    pub profiles_found: usize,
    pub profiles_accepted: usize,
    /// True when profile enqueueing stopped early on the agent cap
    pub cap_reached: bool,
    /// Profile links parked until an abandoned profile frees a slot
    pub profiles_deferred: usize,
    pub pages_accepted: usize,
}

/// Enqueues the profile and pagination links of a directory page
///
/// `page_url` is where the page was actually served from, after redirects;
/// pagination links resolve against it. Profile enqueueing stops at the first
/// `CapReached` and the page's remaining profile links are parked in the
/// frontier. Pagination links are still enqueued so queued directory work
/// keeps draining.
pub fn handle_listing(
    frontier: &Frontier,
    rules: &SiteRules,
    request: &Request,
    page_url: &Url,
    document: &Html,
) -> ListingOutcome {
    let mut outcome = ListingOutcome::default();
    let source = Some(request.url.as_str());

    let profile_links = extract_profile_links(document, &rules.origin, &rules.profile_marker);
    outcome.profiles_found = profile_links.len();
    tracing::info!(
        "Found {} profile links on {}",
        outcome.profiles_found,
        request.url
    );

    for (index, link) in profile_links.iter().enumerate() {
        match frontier.enqueue(link, PageRole::Profile, source) {
            Ok(EnqueueOutcome::Accepted) => outcome.profiles_accepted += 1,
            Ok(EnqueueOutcome::AlreadySeen) => {}
            Ok(EnqueueOutcome::CapReached) => {
                tracing::info!(
                    "Agent cap of {} reached, not queueing more profiles from {}",
                    frontier.state().max_agents(),
                    request.url
                );
                outcome.cap_reached = true;
                outcome.profiles_deferred =
                    1 + defer_remaining(frontier, &profile_links[index + 1..], source);
                break;
            }
            Err(e) => tracing::debug!("Skipping profile link {}: {}", link, e),
        }
    }

    let page_links =
        extract_listing_links(document, page_url, &rules.listing_glob, &rules.profile_marker);
    for link in &page_links {
        match frontier.enqueue(link, PageRole::Listing, source) {
            Ok(EnqueueOutcome::Accepted) => outcome.pages_accepted += 1,
            Ok(_) => {}
            Err(e) => tracing::debug!("Skipping listing link {}: {}", link, e),
        }
    }

    tracing::debug!(
        "Listing {}: {} profiles queued, {} pages queued",
        request.url,
        outcome.profiles_accepted,
        outcome.pages_accepted
    );

    outcome
}

/// Parks the profile links left on a page after the cap refused one
fn defer_remaining(frontier: &Frontier, links: &[String], source: Option<&str>) -> usize {
    links
        .iter()
        .filter(|link| match frontier.defer_profile(link, source) {
            Ok(parked) => parked,
            Err(e) => {
                tracing::debug!("Skipping profile link {}: {}", link, e);
                false
            }
        })
        .count()
}

/// Extracts one agent record and hands it to the sink
///
/// The record always counts as emitted, even when every field is `N/A` or the
/// sink fails to store it.
pub fn handle_profile(
    state: &CrawlState,
    sink: &dyn RecordSink,
    request: &Request,
    document: &Html,
) -> AgentRecord {
    let record = extract_agent(document, request.url.as_str());

    if let Err(e) = sink.push_record(&record) {
        tracing::error!("Failed to store record for {}: {}", request.url, e);
    }

    let emitted = state.record_emitted();
    tracing::info!(
        "Scraped agent: {} ({}/{})",
        record.name,
        emitted,
        state.max_agents()
    );

    record
}
