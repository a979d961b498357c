use serde::Deserialize;

const DEFAULT_ORIGIN: &str = "https://www.zillow.com";
const DEFAULT_DIRECTORY: &str = "https://www.zillow.com/professionals/real-estate-agent-reviews/";

/// Main configuration structure for Realtor-Scout
///
/// Every section has defaults, so an empty file describes the stock crawl of
/// the agent directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Directory pages the crawl starts from
    #[serde(default = "default_start_urls")]
    pub start_urls: Vec<String>,

    /// Hard ceiling on the number of fetched requests
    #[serde(default = "default_max_requests_per_crawl")]
    pub max_requests_per_crawl: u64,

    /// Hard ceiling on the number of emitted agent records
    #[serde(default = "default_max_agents")]
    pub max_agents: u64,

    /// Maximum number of concurrent page fetches
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: u32,

    /// Retries after the first failed attempt of a fetch
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff between retries (milliseconds), doubled per attempt
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_urls: default_start_urls(),
            max_requests_per_crawl: default_max_requests_per_crawl(),
            max_agents: default_max_agents(),
            max_concurrency: default_max_concurrency(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Shape of the directory site being crawled
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Canonical origin used to absolutize profile links
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path fragment identifying agent profile links
    #[serde(default = "default_profile_marker")]
    pub profile_marker: String,

    /// Glob that pagination links must match to stay inside the directory
    #[serde(default = "default_listing_glob")]
    pub listing_glob: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            profile_marker: default_profile_marker(),
            listing_glob: default_listing_glob(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(default = "default_contact_url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: default_contact_url(),
        }
    }
}

/// Egress proxies, rotated per request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Path the JSON export is written to
    #[serde(default = "default_export_path")]
    pub export_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            export_path: default_export_path(),
        }
    }
}

fn default_start_urls() -> Vec<String> {
    vec![DEFAULT_DIRECTORY.to_string()]
}

fn default_max_requests_per_crawl() -> u64 {
    100
}

fn default_max_agents() -> u64 {
    50
}

fn default_max_concurrency() -> u32 {
    5
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

fn default_profile_marker() -> String {
    "/profile/".to_string()
}

fn default_listing_glob() -> String {
    format!("{}**", DEFAULT_DIRECTORY)
}

fn default_crawler_name() -> String {
    "realtor-scout".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_contact_url() -> String {
    "https://github.com/realtor-scout/realtor-scout".to_string()
}

fn default_database_path() -> String {
    "./realtor-scout.db".to_string()
}

fn default_export_path() -> String {
    "./agents.json".to_string()
}
