//! Crawl worker pool
//!
//! A fixed number of tokio tasks drain one shared [`WorkQueue`]. For every
//! target a worker fetches the page, reads a bounded prefix of the body,
//! extracts the title and records a [`SiteSummary`]. A failed fetch is put
//! back on the queue once; the second failure is recorded with status 0.
//!
//! The pool finishes when every worker has seen an empty queue and exited.

use crate::config::CrawlerConfig;
use crate::crawler::body::read_truncated_until;
use crate::crawler::fetcher::{fetch_with_timeout, FetchError};
use crate::crawler::parser::title_or_placeholder;
use crate::crawler::progress::ProgressReporter;
use crate::crawler::queue::{Target, WorkQueue};
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Status recorded for a target that could not be reached after its retry
pub const UNREACHABLE_STATUS: u16 = 0;

/// Title recorded when the final attempt timed out
pub const TIMEOUT_TITLE: &str = "timeout";

/// Title recorded when the final attempt failed for any other reason
pub const UNREACHABLE_TITLE: &str = "unreachable";

/// Final observation for one hostname
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSummary {
    pub title: String,

    /// HTTP status of the response, or [`UNREACHABLE_STATUS`]
    pub status: u16,
}

impl SiteSummary {
    /// Summary for a target whose second attempt failed
    pub fn unreachable(error: &FetchError) -> Self {
        let title = if error.is_timeout() {
            TIMEOUT_TITLE
        } else {
            UNREACHABLE_TITLE
        };
        Self {
            title: title.to_string(),
            status: UNREACHABLE_STATUS,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.status != UNREACHABLE_STATUS
    }
}

/// Summaries keyed by hostname
pub type SiteSummaries = BTreeMap<String, SiteSummary>;

/// Per-target result of one attempt
enum Attempt {
    Finished,
    Requeued,
}

/// State shared by all workers of one run
struct CrawlState {
    client: Client,
    config: CrawlerConfig,
    queue: WorkQueue,
    summaries: Mutex<SiteSummaries>,
    progress: ProgressReporter,
    active_workers: AtomicUsize,
}

/// Runs the probe over a set of targets with bounded concurrency
pub struct CrawlPool {
    client: Client,
    config: CrawlerConfig,
}

impl CrawlPool {
    /// Creates a pool
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client shared by every worker
    /// * `config` - Worker count, timeouts, body limit and URL template
    pub fn new(client: Client, config: CrawlerConfig) -> Self {
        Self { client, config }
    }

    /// Number of workers the pool launches
    pub fn concurrency(&self) -> usize {
        self.config.concurrency.max(1)
    }

    /// Probes every target and returns one summary per hostname
    ///
    /// Returns once all workers have exited. Per-target failures are folded
    /// into the summaries; nothing here aborts the run.
    pub async fn run(&self, targets: Vec<Target>) -> SiteSummaries {
        let workers = self.concurrency();
        let total = targets.len();

        tracing::info!(
            "Probing {} targets with {} workers (timeout {:?}, body limit {} bytes)",
            total,
            workers,
            self.config.request_timeout(),
            self.config.body_limit_bytes
        );

        let state = Arc::new(CrawlState {
            client: self.client.clone(),
            config: self.config.clone(),
            queue: WorkQueue::new(targets),
            summaries: Mutex::new(BTreeMap::new()),
            progress: ProgressReporter::new(total),
            active_workers: AtomicUsize::new(workers),
        });

        let mut set = JoinSet::new();
        for id in 0..workers {
            set.spawn(worker(id, Arc::clone(&state)));
        }

        while let Some(joined) = set.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Crawl worker stopped abnormally: {}", e);
            }
        }

        tracing::info!(
            "Finished probing {} targets in {:.1?}",
            total,
            state.progress.elapsed()
        );

        let mut summaries = state
            .summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *summaries)
    }
}

async fn worker(id: usize, state: Arc<CrawlState>) {
    while let Some(target) = state.queue.pop() {
        if let Attempt::Requeued = probe(&state, target).await {
            continue;
        }
        state.progress.report(state.queue.remaining());
    }

    let still_active = state.active_workers.fetch_sub(1, Ordering::Relaxed) - 1;
    tracing::debug!(
        "Worker {} exiting ({} other workers active, {} queue items remaining)",
        id,
        still_active,
        state.queue.remaining()
    );
}

/// One attempt at a target: fetch, read, classify, record
async fn probe(state: &CrawlState, target: Target) -> Attempt {
    let url = state.config.url_for(&target.host);
    tracing::debug!("Fetching {} for {} ({:?})", url, target.owner, target.source);

    let timeout = state.config.request_timeout();
    let response = match fetch_with_timeout(&state.client, &url, timeout).await {
        Ok(response) => response,
        Err(error) => return handle_failure(state, target, error),
    };

    let status = response.status().as_u16();
    let body = read_body(response, state.config.body_limit_bytes, timeout).await;
    let summary = SiteSummary {
        title: title_or_placeholder(&body),
        status,
    };

    tracing::debug!("{} -> {} {:?}", target.host, status, summary.title);
    record(state, target.host, summary);
    Attempt::Finished
}

/// Requeues a first failure, finalizes a second one
fn handle_failure(state: &CrawlState, target: Target, error: FetchError) -> Attempt {
    let target = match state.queue.push_retry(target) {
        Ok(()) => {
            tracing::debug!("Retrying {} after failure", error.url());
            return Attempt::Requeued;
        }
        Err(target) => target,
    };

    if error.is_timeout() {
        tracing::warn!("{}", error);
    } else {
        tracing::debug!("Giving up on {}: {}", target.host, error);
    }

    record(state, target.host, SiteSummary::unreachable(&error));
    Attempt::Finished
}

/// Reads the response prefix, stopping early if the body stalls past `timeout`
async fn read_body(response: reqwest::Response, limit: usize, timeout: Duration) -> String {
    let deadline = Instant::now() + timeout;
    read_truncated_until(Box::pin(response.bytes_stream()), limit, deadline).await
}

fn record(state: &CrawlState, host: String, summary: SiteSummary) {
    let mut summaries = state
        .summaries
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(previous) = summaries.insert(host.clone(), summary) {
        tracing::error!("Summary for {} recorded twice (was {:?})", host, previous);
    }
}
