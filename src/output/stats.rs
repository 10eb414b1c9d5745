//! Run statistics derived from the report
//!
//! Printed to stdout at the end of a crawl and in dry-run mode.

use crate::crawler::{SiteSummaries, TIMEOUT_TITLE};
use crate::output::CensusReport;
use std::collections::BTreeMap;

/// How many top entries of each ranking are printed
const TOP_N: usize = 10;

/// Crawl outcome counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of hostnames probed
    pub total_sites: u64,

    /// Sites that answered with any HTTP status
    pub reachable: u64,

    /// Sites whose final attempt timed out
    pub timed_out: u64,

    /// Sites whose final attempt failed otherwise
    pub unreachable: u64,

    /// Reachable sites grouped by status class ("2xx", "4xx", ...)
    pub by_status_class: BTreeMap<String, u64>,
}

impl CrawlStatistics {
    pub fn from_summaries(summaries: &SiteSummaries) -> Self {
        let mut stats = Self {
            total_sites: summaries.len() as u64,
            ..Self::default()
        };

        for summary in summaries.values() {
            if summary.is_reachable() {
                stats.reachable += 1;
                *stats
                    .by_status_class
                    .entry(format!("{}xx", summary.status / 100))
                    .or_insert(0) += 1;
            } else if summary.title == TIMEOUT_TITLE {
                stats.timed_out += 1;
            } else {
                stats.unreachable += 1;
            }
        }

        stats
    }

    /// Returns the reachable share as a percentage
    pub fn reachable_rate(&self) -> f64 {
        if self.total_sites == 0 {
            return 0.0;
        }
        (self.reachable as f64 / self.total_sites as f64) * 100.0
    }
}

/// Prints the rankings to stdout
pub fn print_rankings(report: &CensusReport) {
    println!("Top Services:");
    for service in report.services_ranked.iter().take(TOP_N) {
        println!("  {:<20} {}", service.name, service.count);
    }
    println!();

    println!("Top Owners:");
    for user in report.usernames_ranked.iter().take(TOP_N) {
        println!("  {:<20} {}", user.username, user.count);
    }
    println!();
}

/// Prints crawl statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("  Sites probed: {}", stats.total_sites);
    println!("  Reachable: {}", stats.reachable);
    println!("  Timed out: {}", stats.timed_out);
    println!("  Unreachable: {}", stats.unreachable);
    println!();

    if !stats.by_status_class.is_empty() {
        println!("Responses by Status:");
        for (class, count) in &stats.by_status_class {
            println!("  {}: {}", class, count);
        }
        println!();
    }

    println!(
        "Reachable Rate: {:.1}% ({} / {} sites)",
        stats.reachable_rate(),
        stats.reachable,
        stats.total_sites
    );
}
