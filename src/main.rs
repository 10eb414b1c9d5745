//! Subdomain Census main entry point
//!
//! This is the command-line interface for the subdomain census.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use subdomain_census::config::{load_config_with_hash, Config};
use subdomain_census::crawler::crawl;
use subdomain_census::output::{
    print_rankings, print_statistics, write_report, CensusReport, CrawlStatistics,
};
use subdomain_census::records::{crawl_targets, load_domains};
use tracing_subscriber::EnvFilter;

/// Subdomain Census: who owns which subdomains, where they are hosted, and
/// whether they are still up
///
/// Reads one JSON record per subdomain, ranks owners and hosting providers,
/// probes every subdomain that has a CNAME, A or AAAA record, and writes
/// everything to a single JSON report.
#[derive(Parser, Debug)]
#[command(name = "subdomain-census")]
#[command(version)]
#[command(about = "Rank and probe user-owned subdomains", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Load records and print rankings without probing or writing anything
    #[arg(long)]
    dry_run: bool,

    /// Override the number of concurrent workers
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Override the report output path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(output) = cli.output {
        config.output.data_path = output;
    }
    subdomain_census::config::validate(&config).context("invalid command-line override")?;

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_census(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("subdomain_census=info,warn"),
            1 => EnvFilter::new("subdomain_census=debug,info"),
            2 => EnvFilter::new("subdomain_census=trace,debug"),
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

/// Handles the --dry-run mode: validates records and shows what would be probed
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let domains = load_domains(&config.input.domains_dir, &config.input.domain_suffix)?;
    let report = CensusReport::from_domains(&domains);
    let targets = crawl_targets(&domains);

    println!("=== Subdomain Census Dry Run ===\n");
    println!("Records: {} in {}", domains.len(), config.input.domains_dir.display());
    println!("Crawl targets: {}", targets.len());
    println!(
        "Workers: {}, timeout: {}ms, body limit: {} bytes",
        config.crawler.concurrency, config.crawler.request_timeout_ms, config.crawler.body_limit_bytes
    );
    println!("Report: {}\n", config.output.data_path.display());

    print_rankings(&report);

    println!("✓ Records are valid");
    Ok(())
}

/// Handles the main run: rank, probe, write
async fn handle_census(config: &Config) -> anyhow::Result<()> {
    let domains = load_domains(&config.input.domains_dir, &config.input.domain_suffix)?;

    tracing::info!("Ranking owners and hosting services");
    let report = CensusReport::from_domains(&domains);

    tracing::info!("Getting site statuses");
    let targets = crawl_targets(&domains);
    let summaries = crawl(config, targets).await?;
    let report = report.with_site_summaries(summaries);

    write_report(&report, &config.output.data_path)?;

    print_statistics(&CrawlStatistics::from_summaries(&report.site_summaries));
    Ok(())
}
