use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, ProxyConfig, SiteConfig, UserAgentConfig,
};
use crate::url::UrlGlob;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_site_config(&config.site)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_proxy_config(&config.proxy)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.start_urls.is_empty() {
        return Err(ConfigError::Validation(
            "start_urls must contain at least one URL".to_string(),
        ));
    }

    for seed in &config.start_urls {
        validate_http_url(seed, "start URL")?;
    }

    // max_agents = 0 is allowed: the crawl then only walks listing pages
    if config.max_requests_per_crawl < 1 {
        return Err(ConfigError::Validation(format!(
            "max_requests_per_crawl must be >= 1, got {}",
            config.max_requests_per_crawl
        )));
    }

    if config.max_concurrency < 1 || config.max_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and 100, got {}",
            config.max_concurrency
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates the directory site description
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url(&config.origin, "origin")?;

    if config.profile_marker.is_empty() {
        return Err(ConfigError::Validation(
            "profile_marker cannot be empty".to_string(),
        ));
    }

    UrlGlob::new(&config.listing_glob)?;

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates proxy URLs
fn validate_proxy_config(config: &ProxyConfig) -> Result<(), ConfigError> {
    for proxy in &config.urls {
        let url = Url::parse(proxy).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid proxy URL '{}': {}", proxy, e))
        })?;

        if !matches!(url.scheme(), "http" | "https" | "socks5" | "socks5h") {
            return Err(ConfigError::Validation(format!(
                "Proxy URL '{}' must use http, https or socks5",
                proxy
            )));
        }
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.export_path.is_empty() {
        return Err(ConfigError::Validation(
            "export_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that a string is an absolute http(s) URL with a host
fn validate_http_url(value: &str, what: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", what, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            what, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            what, value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_start_urls_rejected() {
        let mut config = Config::default();
        config.crawler.start_urls.clear();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_non_http_seed_rejected() {
        let mut config = Config::default();
        config.crawler.start_urls = vec!["ftp://example.com/agents".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_max_agents_allowed() {
        let mut config = Config::default();
        config.crawler.max_agents = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut config = Config::default();
        config.crawler.max_concurrency = 0;
        assert!(validate(&config).is_err());

        config.crawler.max_concurrency = 101;
        assert!(validate(&config).is_err());

        config.crawler.max_concurrency = 100;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_glob_rejected() {
        let mut config = Config::default();
        config.site.listing_glob = String::new();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_proxy_scheme() {
        let mut config = Config::default();
        config.proxy.urls = vec!["socks5://127.0.0.1:9050".to_string()];
        assert!(validate(&config).is_ok());

        config.proxy.urls = vec!["ftp://proxy.example.com".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_crawler_name_characters() {
        let mut config = Config::default();
        config.user_agent.crawler_name = "bad name!".to_string();
        assert!(validate(&config).is_err());
    }
}
