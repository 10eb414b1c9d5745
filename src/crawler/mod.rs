//! Crawler module for probing subdomains
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a hard per-request deadline
//! - Bounded body reading and title extraction
//! - The retry-once work queue and the worker pool draining it
//! - Progress reporting

mod body;
mod fetcher;
mod parser;
mod pool;
mod progress;
mod queue;

pub use body::{read_truncated, read_truncated_until};
pub use fetcher::{build_http_client, fetch_with_timeout, user_agent_string, FetchError};
pub use parser::{extract_title, title_or_placeholder, NO_TITLE};
pub use pool::{
    CrawlPool, SiteSummaries, SiteSummary, TIMEOUT_TITLE, UNREACHABLE_STATUS, UNREACHABLE_TITLE,
};
pub use progress::{ProgressReporter, ProgressSnapshot, BAR_WIDTH};
pub use queue::{CrawlSource, Target, WorkQueue};

use crate::config::Config;
use crate::CensusError;

/// Probes every target using the configured client and pool
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP client from the user agent settings
/// 2. Seed the work queue with `targets`
/// 3. Run the worker pool until the queue is drained
///
/// # Returns
///
/// * `Ok(SiteSummaries)` - One summary per target hostname
/// * `Err(CensusError)` - The HTTP client could not be built
pub async fn crawl(config: &Config, targets: Vec<Target>) -> Result<SiteSummaries, CensusError> {
    let client = build_http_client(&config.user_agent)?;
    let pool = CrawlPool::new(client, config.crawler.clone());
    Ok(pool.run(targets).await)
}
