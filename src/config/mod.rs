//! Configuration module for Realtor-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a file crawls the stock directory.
//!
//! # Example
//!
//! ```no_run
//! use realtor_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Will stop after {} agents", config.crawler.max_agents);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, ProxyConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, DEFAULT_CONFIG_HASH,
};
pub use validation::validate;
