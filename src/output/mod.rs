//! Output module for census results
//!
//! This module handles:
//! - Assembling the rankings and site summaries into one report
//! - Writing the report as JSON
//! - Printing run statistics

mod report;
pub mod stats;

pub use report::{write_report, CensusReport};
pub use stats::{print_rankings, print_statistics, CrawlStatistics};
