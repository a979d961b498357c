use std::sync::{Mutex, MutexGuard};

/// Snapshot of the crawl counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlCounters {
    /// Agent records handed to the sink
    pub records_emitted: u64,

    /// Requests that finished processing, successfully or not
    pub requests_processed: u64,

    /// Accepted profile requests that have not completed or been abandoned
    pub profiles_outstanding: u64,
}

/// Process-scoped crawl counters shared by the frontier, the handlers and the
/// crawl loop
///
/// All counters sit behind one mutex so that the agent cap check and the slot
/// reservation happen in a single critical section. Invariant:
/// `records_emitted + profiles_outstanding <= max_agents`.
#[derive(Debug)]
pub struct CrawlState {
    max_agents: u64,
    counters: Mutex<CrawlCounters>,
}

impl CrawlState {
    /// Creates zeroed counters for a crawl capped at `max_agents` records
    pub fn new(max_agents: u64) -> Self {
        Self {
            max_agents,
            counters: Mutex::new(CrawlCounters::default()),
        }
    }

    /// The configured agent cap
    pub fn max_agents(&self) -> u64 {
        self.max_agents
    }

    /// Reserves a slot for a new profile request
    ///
    /// Returns false once emitted plus outstanding profiles reach the cap.
    pub fn try_reserve_profile(&self) -> bool {
        let mut counters = self.lock();
        if counters.records_emitted + counters.profiles_outstanding >= self.max_agents {
            return false;
        }
        counters.profiles_outstanding += 1;
        true
    }

    /// Gives back a reserved profile slot without emitting a record
    pub fn release_profile(&self) {
        let mut counters = self.lock();
        counters.profiles_outstanding = counters.profiles_outstanding.saturating_sub(1);
    }

    /// Converts a reserved profile slot into an emitted record
    ///
    /// Returns the new `records_emitted` value.
    pub fn record_emitted(&self) -> u64 {
        let mut counters = self.lock();
        counters.profiles_outstanding = counters.profiles_outstanding.saturating_sub(1);
        counters.records_emitted += 1;
        counters.records_emitted
    }

    /// Counts one finished request, returning the new total
    pub fn record_request_processed(&self) -> u64 {
        let mut counters = self.lock();
        counters.requests_processed += 1;
        counters.requests_processed
    }

    /// Number of requests processed so far
    pub fn requests_processed(&self) -> u64 {
        self.lock().requests_processed
    }

    /// True once the emitted record count has reached the agent cap
    pub fn agent_cap_reached(&self) -> bool {
        self.lock().records_emitted >= self.max_agents
    }

    /// Copies all counters at once
    pub fn snapshot(&self) -> CrawlCounters {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, CrawlCounters> {
        // A panicked worker must not stop the final count from being reported
        self.counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
