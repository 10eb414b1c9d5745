//! Subdomain Census: ranks owners and hosting providers of user-owned
//! subdomains, then probes every crawlable subdomain for a live status and
//! page title.
//!
//! The crawl itself runs on a bounded worker pool with a retry-once queue,
//! see [`crawler`].

pub mod config;
pub mod crawler;
pub mod output;
pub mod ranking;
pub mod records;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for census operations
#[derive(Debug, Error)]
pub enum CensusError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to write report to {path}: {source}")]
    Report {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while loading domain record files
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to read domains directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed record {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid record {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// Result type alias for census operations
pub type Result<T> = std::result::Result<T, CensusError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for record loading
pub type RecordResult<T> = std::result::Result<T, RecordError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlPool, SiteSummary, Target};
pub use output::CensusReport;
pub use records::DomainFile;
