//! Role-based dispatch of fetched pages

use crate::config::SiteConfig;
use crate::crawler::frontier::Frontier;
use crate::crawler::handlers::{handle_listing, handle_profile, ListingOutcome};
use crate::crawler::request::{PageRole, Request};
use crate::extract::AgentRecord;
use crate::output::RecordSink;
use crate::url::UrlGlob;
use crate::{ConfigError, ConfigResult};
use scraper::Html;
use std::sync::Arc;
use url::Url;

/// Site-specific rules the handlers work from
#[derive(Debug, Clone)]
pub struct SiteRules {
    /// Base for resolving relative profile links
    pub origin: Url,
    /// Substring identifying profile links
    pub profile_marker: String,
    /// Absolute URLs a pagination link must match
    pub listing_glob: UrlGlob,
}

impl SiteRules {
    pub fn from_config(site: &SiteConfig) -> ConfigResult<Self> {
        let origin = Url::parse(&site.origin).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid site origin '{}': {}", site.origin, e))
        })?;

        Ok(Self {
            origin,
            profile_marker: site.profile_marker.clone(),
            listing_glob: UrlGlob::new(&site.listing_glob)?,
        })
    }
}

/// What processing a page produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Listing(ListingOutcome),
    Profile(AgentRecord),
}

/// Dispatches fetched pages to the handler for their role
pub struct Router {
    frontier: Arc<Frontier>,
    rules: SiteRules,
    sink: Arc<dyn RecordSink>,
}

impl Router {
    pub fn new(frontier: Arc<Frontier>, rules: SiteRules, sink: Arc<dyn RecordSink>) -> Self {
        Self {
            frontier,
            rules,
            sink,
        }
    }

    /// Parses `body` and runs the handler matching the request's role
    ///
    /// `page_url` is the URL the body was served from. Parsing happens here
    /// rather than in the caller because the parsed document cannot cross an
    /// await point.
    pub fn route(&self, request: &Request, page_url: &Url, body: &str) -> PageOutcome {
        let document = Html::parse_document(body);
        match request.role {
            PageRole::Listing => PageOutcome::Listing(handle_listing(
                &self.frontier,
                &self.rules,
                request,
                page_url,
                &document,
            )),
            PageRole::Profile => PageOutcome::Profile(handle_profile(
                self.frontier.state(),
                self.sink.as_ref(),
                request,
                &document,
            )),
        }
    }
}
