//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator wires the frontier, fetcher, router and sink together and
//! runs the crawl loop:
//! - seeding the frontier with the start URLs
//! - dispatching requests to a bounded pool of tasks
//! - stopping dispatch at the request ceiling or when work runs out
//! - draining in-flight requests and recording the run's final counters

use crate::config::Config;
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::frontier::{EnqueueOutcome, Frontier};
use crate::crawler::request::{PageRole, Request};
use crate::crawler::router::{PageOutcome, Router, SiteRules};
use crate::output::DatasetSink;
use crate::state::CrawlState;
use crate::storage::{SqliteStorage, Storage};
use crate::ScoutError;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Final counters of a finished crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlReport {
    pub run_id: i64,
    pub records_emitted: u64,
    pub requests_processed: u64,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    storage: Arc<Mutex<dyn Storage + Send>>,
    state: Arc<CrawlState>,
    frontier: Arc<Frontier>,
    router: Arc<Router>,
    fetcher: Arc<Fetcher>,
    run_id: i64,
}

impl Coordinator {
    /// Creates a coordinator and records a new run in the database
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `config_hash` - Hash of the configuration, stored with the run
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run, with the start URLs queued
    /// * `Err(ScoutError)` - A start URL is malformed, the site rules are
    ///   invalid, the HTTP clients cannot be built or the database cannot be
    ///   opened
    pub fn new(config: Config, config_hash: &str) -> Result<Self, ScoutError> {
        // Build site rules and HTTP clients
        let rules = SiteRules::from_config(&config.site)?;
        let fetcher = Fetcher::new(&config)?;

        // Seeds are queued before the run is recorded
        let state = Arc::new(CrawlState::new(config.crawler.max_agents));
        let frontier = Arc::new(Frontier::new(Arc::clone(&state)));

        for seed in &config.crawler.start_urls {
            if frontier.enqueue(seed, PageRole::Listing, None)? == EnqueueOutcome::AlreadySeen {
                tracing::debug!("Duplicate start URL {}", seed);
            }
        }

        // Initialize storage and record the run
        let mut storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
        let run_id = storage.create_run(config_hash)?;
        let storage: Arc<Mutex<dyn Storage + Send>> = Arc::new(Mutex::new(storage));

        // Wire the handlers to the frontier and the dataset
        let sink = Arc::new(DatasetSink::new(Arc::clone(&storage), run_id));
        let router = Arc::new(Router::new(Arc::clone(&frontier), rules, sink));

        tracing::info!(
            "Run {}: {} start URLs, max {} requests, max {} agents, {} workers, {} egress routes",
            run_id,
            frontier.len(),
            config.crawler.max_requests_per_crawl,
            config.crawler.max_agents,
            config.crawler.max_concurrency,
            fetcher.route_count()
        );

        Ok(Self {
            config: Arc::new(config),
            storage,
            state,
            frontier,
            router,
            fetcher: Arc::new(fetcher),
            run_id,
        })
    }

    /// Runs the crawl loop to completion
    ///
    /// Requests are dispatched while `requests_processed + in_flight` stays
    /// below the request ceiling. The loop ends when nothing is in flight and
    /// nothing more may be dispatched.
    pub async fn run(self) -> Result<CrawlReport, ScoutError> {
        let max_requests = self.config.crawler.max_requests_per_crawl;
        let max_workers = self.config.crawler.max_concurrency.max(1) as usize;
        let start_time = Instant::now();

        tracing::info!("Starting crawl run {}", self.run_id);

        let mut tasks = JoinSet::new();
        let mut ceiling_logged = false;

        loop {
            while tasks.len() < max_workers {
                let in_flight = tasks.len() as u64;
                if self.state.requests_processed() + in_flight >= max_requests {
                    if !ceiling_logged {
                        tracing::info!("Request limit of {} reached", max_requests);
                        ceiling_logged = true;
                    }
                    break;
                }

                let Some(request) = self.frontier.dequeue() else {
                    break;
                };

                let fetcher = Arc::clone(&self.fetcher);
                let router = Arc::clone(&self.router);
                let frontier = Arc::clone(&self.frontier);
                tasks.spawn(process_request(fetcher, router, frontier, request));
            }

            match tasks.join_next().await {
                Some(Ok(())) => {}
                Some(Err(e)) => tracing::error!("Crawl task failed: {}", e),
                None => break,
            }
        }

        let counters = self.state.snapshot();
        {
            let mut storage = self
                .storage
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            storage.complete_run(
                self.run_id,
                counters.records_emitted,
                counters.requests_processed,
            )?;
        }

        tracing::info!(
            "Crawl completed: {} agents from {} requests in {:?} ({} URLs left in frontier, {} profiles deferred)",
            counters.records_emitted,
            counters.requests_processed,
            start_time.elapsed(),
            self.frontier.len(),
            self.frontier.deferred_len()
        );

        Ok(CrawlReport {
            run_id: self.run_id,
            records_emitted: counters.records_emitted,
            requests_processed: counters.requests_processed,
        })
    }
}

/// Fetches one request and hands the page to its handler
///
/// A request that cannot be fetched is abandoned; if it was a profile its
/// reserved slot goes back to the frontier, which may hand it to a deferred
/// profile. Either way it counts as processed.
async fn process_request(
    fetcher: Arc<Fetcher>,
    router: Arc<Router>,
    frontier: Arc<Frontier>,
    request: Request,
) {
    tracing::debug!("Processing {} ({})", request.url, request.role);

    match fetcher.fetch(request.url.as_str()).await {
        FetchResult::Success {
            final_url, body, ..
        } => {
            let page_url = Url::parse(&final_url).unwrap_or_else(|_| request.url.clone());
            if let PageOutcome::Profile(record) = router.route(&request, &page_url, &body) {
                tracing::debug!(
                    "{} of 4 fields found on {}",
                    record.fields_found(),
                    record.profile_url
                );
            }
        }
        failure => {
            tracing::error!(
                "Giving up on {} ({}): {}",
                request.url,
                request.role,
                failure.describe()
            );
            if request.is_profile() {
                frontier.release_profile();
            }
        }
    }

    frontier.state().record_request_processed();
}

/// Runs a complete crawl for `config`
///
/// This is the main entry point for starting a crawl. `config_hash`
/// identifies the configuration the run was started with.
pub async fn run_crawl(config: Config, config_hash: &str) -> Result<CrawlReport, ScoutError> {
    Coordinator::new(config, config_hash)?.run().await
}
