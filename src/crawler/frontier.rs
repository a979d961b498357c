//! Deduplicated request frontier
//!
//! The frontier is a single FIFO queue plus the set of request identities seen
//! so far. Both sit behind one mutex. Profile enqueues additionally reserve a
//! slot in [`CrawlState`], which is how the agent cap is enforced before any
//! profile page is fetched.
//!
//! Profile links refused on the cap are parked in a deferred list. When an
//! abandoned profile gives its slot back, the oldest parked link takes it, so
//! a failed fetch does not cost the crawl an agent that was already found.

use crate::crawler::request::{PageRole, Request};
use crate::state::CrawlState;
use crate::url::normalize_url;
use crate::{UrlError, UrlResult};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use url::Url;

/// Result of offering a URL to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The request was queued
    Accepted,
    /// A request with the same normalized URL was already queued or processed
    AlreadySeen,
    /// Profile request refused because the agent cap is committed; the link
    /// is parked until a slot is released
    CapReached,
}

#[derive(Debug, Default)]
struct Queue {
    pending: VecDeque<Request>,
    seen: HashSet<String>,
    deferred: VecDeque<Request>,
    deferred_keys: HashSet<String>,
}

impl Queue {
    /// Parks a refused profile request, once per identity
    fn defer(&mut self, request: Request) -> bool {
        if !self.deferred_keys.insert(request.unique_key.clone()) {
            return false;
        }
        self.deferred.push_back(request);
        true
    }
}

#[derive(Debug)]
pub struct Frontier {
    queue: Mutex<Queue>,
    state: Arc<CrawlState>,
}

impl Frontier {
    pub fn new(state: Arc<CrawlState>) -> Self {
        Self {
            queue: Mutex::new(Queue::default()),
            state,
        }
    }

    /// The crawl counters this frontier checks the agent cap against
    pub fn state(&self) -> &Arc<CrawlState> {
        &self.state
    }

    /// Offers a URL to the frontier
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL as discovered; it is kept as given for fetching
    /// * `role` - Handler that will process the page
    /// * `discovered_via` - Page the link was found on, `None` for seeds
    ///
    /// # Returns
    ///
    /// * `Accepted` - The request was queued
    /// * `AlreadySeen` - Its normalized form was queued before; nothing changes
    /// * `CapReached` - A Profile with no free slot; it is parked, not marked
    ///   seen
    ///
    /// # Errors
    ///
    /// Returns a `UrlError` when the URL cannot be normalized.
    pub fn enqueue(
        &self,
        url: &str,
        role: PageRole,
        discovered_via: Option<&str>,
    ) -> UrlResult<EnqueueOutcome> {
        let request = identify(url, role, discovered_via)?;

        let mut queue = self.lock();
        if queue.seen.contains(&request.unique_key) {
            return Ok(EnqueueOutcome::AlreadySeen);
        }

        if role == PageRole::Profile && !self.state.try_reserve_profile() {
            queue.defer(request);
            return Ok(EnqueueOutcome::CapReached);
        }

        queue.seen.insert(request.unique_key.clone());
        queue.pending.push_back(request);

        Ok(EnqueueOutcome::Accepted)
    }

    /// Parks a Profile URL without trying to reserve a slot
    ///
    /// Used for the links a listing page still holds after the cap refused
    /// one of them. Returns false when the URL is already seen or parked.
    pub fn defer_profile(&self, url: &str, discovered_via: Option<&str>) -> UrlResult<bool> {
        let request = identify(url, PageRole::Profile, discovered_via)?;

        let mut queue = self.lock();
        if queue.seen.contains(&request.unique_key) {
            return Ok(false);
        }
        Ok(queue.defer(request))
    }

    /// Gives back the slot of an abandoned profile request
    ///
    /// The oldest parked profile that has not been seen since takes the slot
    /// and is queued.
    pub fn release_profile(&self) {
        let mut queue = self.lock();
        self.state.release_profile();

        while let Some(request) = queue.deferred.pop_front() {
            if queue.seen.contains(&request.unique_key) {
                queue.deferred_keys.remove(&request.unique_key);
                continue;
            }

            if !self.state.try_reserve_profile() {
                queue.deferred.push_front(request);
                break;
            }

            tracing::debug!("Queueing deferred profile {}", request.url);
            queue.deferred_keys.remove(&request.unique_key);
            queue.seen.insert(request.unique_key.clone());
            queue.pending.push_back(request);
            break;
        }
    }

    /// Removes the oldest pending request
    ///
    /// Profile requests dequeued after the agent cap was reached are dropped
    /// and their reserved slot is released.
    pub fn dequeue(&self) -> Option<Request> {
        let mut queue = self.lock();
        while let Some(request) = queue.pending.pop_front() {
            if request.is_profile() && self.state.agent_cap_reached() {
                // No parked profile can take the slot once the cap is reached
                self.state.release_profile();
                tracing::debug!("Dropping {}: agent cap reached", request.url);
                continue;
            }
            return Some(request);
        }
        None
    }

    /// Number of pending requests
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().pending.is_empty()
    }

    /// Number of profile links parked on the agent cap
    pub fn deferred_len(&self) -> usize {
        self.lock().deferred.len()
    }

    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Builds the request for `url`, keyed by its normalized form
fn identify(url: &str, role: PageRole, discovered_via: Option<&str>) -> UrlResult<Request> {
    let key = normalize_url(url)?.as_str().to_string();
    let url = Url::parse(url).map_err(|e| UrlError::Parse(e.to_string()))?;
    Ok(Request::new(url, role, discovered_via.map(str::to_string)).with_unique_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontier(max_agents: u64) -> Frontier {
        Frontier::new(Arc::new(CrawlState::new(max_agents)))
    }

    #[test]
    fn test_enqueue_is_idempotent() {
        let frontier = frontier(10);
        let url = "https://www.example.com/profile/jane/";

        assert_eq!(
            frontier.enqueue(url, PageRole::Profile, None).unwrap(),
            EnqueueOutcome::Accepted
        );
        assert_eq!(
            frontier.enqueue(url, PageRole::Profile, None).unwrap(),
            EnqueueOutcome::AlreadySeen
        );
        // Same identity after normalization
        assert_eq!(
            frontier
                .enqueue("https://WWW.example.com/profile/jane#bio", PageRole::Profile, None)
                .unwrap(),
            EnqueueOutcome::AlreadySeen
        );

        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.state().snapshot().profiles_outstanding, 1);
    }

    #[test]
    fn test_already_seen_listing_not_requeued() {
        let frontier = frontier(10);
        let url = "https://www.example.com/agents/seattle/";

        frontier.enqueue(url, PageRole::Listing, None).unwrap();
        assert!(frontier.dequeue().is_some());

        assert_eq!(
            frontier.enqueue(url, PageRole::Listing, None).unwrap(),
            EnqueueOutcome::AlreadySeen
        );
        assert!(frontier.dequeue().is_none());
    }

    #[test]
    fn test_profile_cap() {
        let frontier = frontier(2);
        let outcomes: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|name| {
                frontier
                    .enqueue(
                        &format!("https://www.example.com/profile/{}", name),
                        PageRole::Profile,
                        None,
                    )
                    .unwrap()
            })
            .collect();

        assert_eq!(
            outcomes,
            vec![
                EnqueueOutcome::Accepted,
                EnqueueOutcome::Accepted,
                EnqueueOutcome::CapReached
            ]
        );

        // Listings are never capped
        assert_eq!(
            frontier
                .enqueue("https://www.example.com/agents/?page=2", PageRole::Listing, None)
                .unwrap(),
            EnqueueOutcome::Accepted
        );
        assert_eq!(frontier.len(), 3);
    }

    #[test]
    fn test_cap_rejection_is_not_marked_seen() {
        let frontier = frontier(1);
        let first = "https://www.example.com/profile/a";
        let second = "https://www.example.com/profile/b";

        frontier.enqueue(first, PageRole::Profile, None).unwrap();
        assert_eq!(
            frontier.enqueue(second, PageRole::Profile, None).unwrap(),
            EnqueueOutcome::CapReached
        );
        // Parked once, however often it is offered
        assert_eq!(
            frontier.enqueue(second, PageRole::Profile, None).unwrap(),
            EnqueueOutcome::CapReached
        );
        assert_eq!(frontier.deferred_len(), 1);

        // The slot comes back without touching the parked link
        frontier.dequeue();
        frontier.state().release_profile();

        assert_eq!(
            frontier.enqueue(second, PageRole::Profile, None).unwrap(),
            EnqueueOutcome::Accepted
        );
    }

    #[test]
    fn test_released_slot_goes_to_deferred_profile() {
        let frontier = frontier(1);
        frontier
            .enqueue("https://www.example.com/profile/a", PageRole::Profile, None)
            .unwrap();
        frontier
            .enqueue("https://www.example.com/profile/b", PageRole::Profile, None)
            .unwrap();
        frontier
            .defer_profile("https://www.example.com/profile/c", None)
            .unwrap();
        assert_eq!(frontier.deferred_len(), 2);

        let failed = frontier.dequeue().unwrap();
        assert_eq!(failed.url.as_str(), "https://www.example.com/profile/a");
        frontier.release_profile();

        let promoted = frontier.dequeue().unwrap();
        assert_eq!(promoted.url.as_str(), "https://www.example.com/profile/b");
        assert_eq!(frontier.deferred_len(), 1);
        assert_eq!(frontier.state().snapshot().profiles_outstanding, 1);

        // Promoted links count as seen
        assert_eq!(
            frontier
                .enqueue("https://www.example.com/profile/b/", PageRole::Profile, None)
                .unwrap(),
            EnqueueOutcome::AlreadySeen
        );
    }

    #[test]
    fn test_release_skips_deferred_links_seen_since() {
        let frontier = frontier(1);
        let a = "https://www.example.com/profile/a";
        let b = "https://www.example.com/profile/b";
        let c = "https://www.example.com/profile/c";

        frontier.enqueue(a, PageRole::Profile, None).unwrap();
        frontier.enqueue(b, PageRole::Profile, None).unwrap();
        frontier.enqueue(c, PageRole::Profile, None).unwrap();

        // b gets in on its own after a's slot frees up
        frontier.dequeue();
        frontier.state().release_profile();
        frontier.enqueue(b, PageRole::Profile, None).unwrap();

        frontier.dequeue();
        frontier.release_profile();

        assert_eq!(frontier.dequeue().unwrap().url.as_str(), c);
        assert_eq!(frontier.deferred_len(), 0);
    }

    #[test]
    fn test_release_without_deferred_links() {
        let frontier = frontier(2);
        frontier
            .enqueue("https://www.example.com/profile/a", PageRole::Profile, None)
            .unwrap();
        frontier.dequeue();
        frontier.release_profile();

        assert!(frontier.is_empty());
        assert_eq!(frontier.state().snapshot().profiles_outstanding, 0);
    }

    #[test]
    fn test_defer_ignores_seen_profiles() {
        let frontier = frontier(5);
        let url = "https://www.example.com/profile/a";
        frontier.enqueue(url, PageRole::Profile, None).unwrap();

        assert!(!frontier.defer_profile(url, None).unwrap());
        assert_eq!(frontier.deferred_len(), 0);
    }

    #[test]
    fn test_zero_agents_accepts_no_profiles() {
        let frontier = frontier(0);
        assert_eq!(
            frontier
                .enqueue("https://www.example.com/profile/a", PageRole::Profile, None)
                .unwrap(),
            EnqueueOutcome::CapReached
        );
        assert_eq!(
            frontier
                .enqueue("https://www.example.com/agents/", PageRole::Listing, None)
                .unwrap(),
            EnqueueOutcome::Accepted
        );
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_fifo_order_across_roles() {
        let frontier = frontier(10);
        frontier
            .enqueue("https://www.example.com/agents/", PageRole::Listing, None)
            .unwrap();
        frontier
            .enqueue(
                "https://www.example.com/profile/a",
                PageRole::Profile,
                Some("https://www.example.com/agents/"),
            )
            .unwrap();
        frontier
            .enqueue("https://www.example.com/agents/?page=2", PageRole::Listing, None)
            .unwrap();

        let first = frontier.dequeue().unwrap();
        assert_eq!(first.role, PageRole::Listing);
        assert_eq!(first.discovered_via, None);

        let second = frontier.dequeue().unwrap();
        assert_eq!(second.role, PageRole::Profile);
        assert_eq!(
            second.discovered_via.as_deref(),
            Some("https://www.example.com/agents/")
        );

        let third = frontier.dequeue().unwrap();
        assert_eq!(third.url.as_str(), "https://www.example.com/agents/?page=2");
        assert_eq!(third.unique_key, "https://www.example.com/agents?page=2");

        assert!(frontier.dequeue().is_none());
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        let frontier = frontier(10);
        assert!(frontier
            .enqueue("ftp://example.com/file", PageRole::Listing, None)
            .is_err());
        assert!(frontier.is_empty());
        assert_eq!(frontier.deferred_len(), 0);
    }
}
