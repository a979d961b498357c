use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Hash recorded for runs that use the built-in defaults instead of a file
pub const DEFAULT_CONFIG_HASH: &str = "default";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
///
/// Missing sections and keys take their defaults, so an empty string yields
/// the default crawl.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    // Parse TOML
    let config: Config = toml::from_str(content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Stored with each crawl run so results can be traced back to the settings
/// that produced them.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
///
/// # Returns
///
/// * `Ok((Config, String))` - Validated configuration and its hash
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
start-urls = ["https://agents.example.com/directory/"]
max-requests-per-crawl = 40
max-agents = 10
max-concurrency = 3

[site]
origin = "https://agents.example.com"
profile-marker = "/agent/"
listing-glob = "https://agents.example.com/directory/**"

[user-agent]
crawler-name = "TestScout"
crawler-version = "1.0"
contact-url = "https://example.com/about"

[output]
database-path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_requests_per_crawl, 40);
        assert_eq!(config.crawler.max_agents, 10);
        assert_eq!(config.crawler.max_concurrency, 3);
        assert_eq!(config.site.profile_marker, "/agent/");
        assert_eq!(config.user_agent.crawler_name, "TestScout");
        assert_eq!(config.output.database_path, "./test.db");
        // Unspecified keys keep their defaults
        assert_eq!(config.crawler.max_retries, 3);
        assert_eq!(config.output.export_path, "./agents.json");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(
            config.crawler.start_urls,
            vec!["https://www.zillow.com/professionals/real-estate-agent-reviews/".to_string()]
        );
        assert_eq!(config.crawler.max_requests_per_crawl, 100);
        assert_eq!(config.crawler.max_agents, 50);
        assert_eq!(config.site.origin, "https://www.zillow.com");
        assert_eq!(
            config.site.listing_glob,
            "https://www.zillow.com/professionals/real-estate-agent-reviews/**"
        );
        assert!(config.proxy.urls.is_empty());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/scout.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
max-requests-per-crawl = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_malformed_seed_is_rejected() {
        let result = parse_config(
            r#"
[crawler]
start-urls = ["not a url"]
"#,
        );
        assert!(matches!(result.unwrap_err(), ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
