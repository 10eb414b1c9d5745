//! Crawl progress reporting
//!
//! Progress is derived on demand from the seeded total, the current queue
//! depth and the time since the crawl started; nothing is stored.

use std::fmt;
use std::time::{Duration, Instant};

/// Width of the rendered progress bar in cells
pub const BAR_WIDTH: usize = 30;

/// A point-in-time view of crawl progress
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub total: usize,
    pub remaining: usize,
    pub processed: usize,

    /// Fraction complete in `0.0..=1.0`
    pub fraction: f64,

    /// Projected time left; absent until something has been processed
    pub eta: Option<Duration>,
}

impl ProgressSnapshot {
    /// Computes progress from queue depth and elapsed time
    pub fn compute(total: usize, remaining: usize, elapsed: Duration) -> Self {
        let processed = total.saturating_sub(remaining);

        let fraction = if total == 0 {
            0.0
        } else {
            processed as f64 / total as f64
        };

        let eta = (processed > 0).then(|| {
            Duration::from_secs_f64(elapsed.as_secs_f64() / processed as f64 * remaining as f64)
        });

        Self {
            total,
            remaining,
            processed,
            fraction,
            eta,
        }
    }

    /// Number of filled bar cells
    pub fn filled_cells(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.processed * BAR_WIDTH / self.total).min(BAR_WIDTH)
    }

    /// Renders the `[****    ]` bar
    pub fn bar(&self) -> String {
        let filled = self.filled_cells();
        format!("[{}{}]", "*".repeat(filled), " ".repeat(BAR_WIDTH - filled))
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} remaining, total {}, ETA: ",
            self.bar(),
            self.remaining,
            self.total
        )?;
        match self.eta {
            Some(eta) => write!(f, "{:.1} seconds)", eta.as_secs_f64()),
            None => write!(f, "unknown)"),
        }
    }
}

/// Tracks the crawl start time and produces snapshots
#[derive(Debug)]
pub struct ProgressReporter {
    total: usize,
    started: Instant,
}

impl ProgressReporter {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            started: Instant::now(),
        }
    }

    pub fn snapshot(&self, remaining: usize) -> ProgressSnapshot {
        ProgressSnapshot::compute(self.total, remaining, self.started.elapsed())
    }

    /// Logs the current progress line
    pub fn report(&self, remaining: usize) -> ProgressSnapshot {
        let snapshot = self.snapshot(remaining);
        tracing::info!("{}", snapshot);
        snapshot
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
