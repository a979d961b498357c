//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Rotating egress proxies per request attempt
//! - Retry with exponential backoff for transient failures
//! - Content-Type checking and error classification

use crate::config::{Config, UserAgentConfig};
use crate::ScoutError;
use reqwest::{redirect::Policy, Client, Proxy, StatusCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const MAX_REDIRECTS: usize = 10;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        status_code: u16,
        content_type: String,
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch { content_type: String },

    /// Non-success HTTP status
    HttpError { status_code: u16 },

    /// Network error (connection refused, timeout, etc.)
    NetworkError { error: String },
}

impl FetchResult {
    /// Whether another attempt could plausibly succeed
    ///
    /// Every HTTP error is retried except 404 and 410, which mark a page that
    /// is gone. Block statuses such as 403 go out again through the next
    /// egress route.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchResult::HttpError { status_code } => {
                *status_code != StatusCode::NOT_FOUND.as_u16()
                    && *status_code != StatusCode::GONE.as_u16()
            }
            FetchResult::NetworkError { .. } => true,
            FetchResult::Success { .. } | FetchResult::ContentMismatch { .. } => false,
        }
    }

    /// Short description of a failed fetch, for logging
    pub fn describe(&self) -> String {
        match self {
            FetchResult::Success { status_code, .. } => format!("HTTP {}", status_code),
            FetchResult::ContentMismatch { content_type } => {
                format!("expected HTML, got '{}'", content_type)
            }
            FetchResult::HttpError { status_code } => format!("HTTP {}", status_code),
            FetchResult::NetworkError { error } => error.clone(),
        }
    }
}

/// Formats the User-Agent header value
///
/// Format: `CrawlerName/Version (+ContactURL)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_url
    )
}

/// Builds an HTTP client, optionally routed through a proxy
///
/// # Example
///
/// ```no_run
/// use realtor_scout::config::UserAgentConfig;
/// use realtor_scout::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig::default();
/// let client = build_http_client(&config, Duration::from_secs(30), None).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
    proxy: Option<&str>,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true);

    if let Some(proxy_url) = proxy {
        builder = builder.proxy(Proxy::all(proxy_url)?);
    }

    builder.build()
}

/// Fetches pages with retries, rotating through the configured egress
pub struct Fetcher {
    /// One client per proxy, or a single direct client
    clients: Vec<Client>,
    next_client: AtomicUsize,
    max_retries: u32,
    retry_delay: Duration,
}

impl Fetcher {
    /// Builds the fetcher described by `config`
    ///
    /// # Errors
    ///
    /// Fails when an HTTP client cannot be built, for instance because a
    /// proxy URL is rejected.
    pub fn new(config: &Config) -> Result<Self, ScoutError> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);

        let clients = if config.proxy.urls.is_empty() {
            vec![build_http_client(&config.user_agent, timeout, None)?]
        } else {
            config
                .proxy
                .urls
                .iter()
                .map(|proxy| build_http_client(&config.user_agent, timeout, Some(proxy)))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            clients,
            next_client: AtomicUsize::new(0),
            max_retries: config.crawler.max_retries,
            retry_delay: Duration::from_millis(config.crawler.retry_delay_ms),
        })
    }

    /// Number of egress routes in the rotation
    pub fn route_count(&self) -> usize {
        self.clients.len()
    }

    /// Fetches `url`, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 5xx, HTTP 429 | Retry |
    /// | Timeout, connection or body error | Retry |
    /// | Other HTTP 4xx | Give up |
    /// | Non-HTML Content-Type | Give up |
    ///
    /// At most `max_retries` retries follow the first attempt. The delay
    /// before retry `n` (starting at 0) is `retry_delay * 2^n`. Each attempt
    /// uses the next client in the rotation.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let mut attempt = 0;
        loop {
            let result = fetch_once(self.next_client(), url).await;

            if !result.is_retryable() || attempt >= self.max_retries {
                return result;
            }

            let delay = self.backoff(attempt);
            tracing::warn!(
                "Fetch of {} failed ({}), retry {}/{} in {:?}",
                url,
                result.describe(),
                attempt + 1,
                self.max_retries,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    fn next_client(&self) -> &Client {
        let index = self.next_client.fetch_add(1, Ordering::Relaxed) % self.clients.len();
        &self.clients[index]
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(1u32 << attempt.min(16))
    }
}

/// Performs a single GET request and classifies the outcome
pub async fn fetch_once(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => classify_error(&e),
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection failed".to_string()
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}
