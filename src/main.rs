//! Realtor-Scout main entry point
//!
//! This is the command-line interface for the Realtor-Scout agent directory
//! crawler.

use anyhow::Context;
use clap::Parser;
use realtor_scout::config::{load_config_with_hash, validate, Config, DEFAULT_CONFIG_HASH};
use realtor_scout::crawler::{run_crawl, user_agent_string};
use realtor_scout::output::{export_latest_run, load_statistics, print_statistics};
use realtor_scout::storage::SqliteStorage;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Realtor-Scout: real-estate agent directory crawler
///
/// Walks a paginated agent directory, visits every agent profile it links
/// to, and stores each agent's name, email, phone and agency.
#[derive(Parser, Debug)]
#[command(name = "realtor-scout")]
#[command(version)]
#[command(about = "Real-estate agent directory crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export"])]
    stats: bool,

    /// Write the latest run's records as JSON and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load(cli.config.as_deref())?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export {
        handle_export(&config)?;
    } else {
        handle_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("realtor_scout=info,warn"),
            1 => EnvFilter::new("realtor_scout=debug,info"),
            2 => EnvFilter::new("realtor_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&Path>) -> anyhow::Result<(Config, String)> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok((config, hash))
        }
        None => {
            let config = Config::default();
            validate(&config).context("Default configuration is invalid")?;
            tracing::info!("No configuration file given, using defaults");
            Ok((config, DEFAULT_CONFIG_HASH.to_string()))
        }
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Realtor-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max requests per crawl: {}", config.crawler.max_requests_per_crawl);
    println!("  Max agents: {}", config.crawler.max_agents);
    println!("  Max concurrency: {}", config.crawler.max_concurrency);
    println!(
        "  Retries: {} (base delay {}ms)",
        config.crawler.max_retries, config.crawler.retry_delay_ms
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nSite:");
    println!("  Origin: {}", config.site.origin);
    println!("  Profile marker: {}", config.site.profile_marker);
    println!("  Listing glob: {}", config.site.listing_glob);

    println!("\nUser Agent: {}", user_agent_string(&config.user_agent));

    if config.proxy.urls.is_empty() {
        println!("\nProxies: none (direct connection)");
    } else {
        println!("\nProxies ({}):", config.proxy.urls.len());
        for proxy in &config.proxy.urls {
            println!("  - {}", proxy);
        }
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Export: {}", config.output.export_path);

    println!("\nStart URLs ({}):", config.crawler.start_urls.len());
    for url in &config.crawler.start_urls {
        println!("  * {}", url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))
        .context("Failed to open database")?;
    let stats = load_statistics(&storage).context("Failed to load statistics")?;

    print_statistics(&stats);

    Ok(())
}

/// Handles the --export mode: writes the latest run's records as JSON
fn handle_export(config: &Config) -> anyhow::Result<()> {
    let storage = SqliteStorage::new(Path::new(&config.output.database_path))
        .context("Failed to open database")?;
    let export_path = Path::new(&config.output.export_path);

    match export_latest_run(&storage, export_path)
        .with_context(|| format!("Failed to export to {}", export_path.display()))?
    {
        Some((run_id, count)) => {
            println!(
                "✓ Exported {} agents from run {} to: {}",
                count,
                run_id,
                export_path.display()
            );
        }
        None => println!("No crawl runs recorded in {}", config.output.database_path),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} start URLs (max {} requests, max {} agents)",
        config.crawler.start_urls.len(),
        config.crawler.max_requests_per_crawl,
        config.crawler.max_agents
    );

    let report = run_crawl(config, config_hash)
        .await
        .context("Crawl failed")?;

    println!(
        "Scraping completed! Total agents scraped: {}",
        report.records_emitted
    );

    Ok(())
}
