//! HTTP fetcher implementation
//!
//! This module handles the network side of a probe:
//! - Building the shared HTTP client with the census user agent
//! - Racing each GET against a wall-clock deadline
//! - Classifying failures as timeouts or network errors

use crate::config::UserAgentConfig;
use reqwest::{Client, Response};
use std::time::Duration;
use thiserror::Error;

/// Why a fetch produced no response
#[derive(Debug, Error)]
pub enum FetchError {
    /// The deadline elapsed before the server answered
    #[error("fetch timed out: {url}")]
    Timeout { url: String },

    /// Connection refused, DNS failure, TLS failure and the like
    #[error("fetch failed for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url } | Self::Network { url, .. } => url,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Request deadlines are enforced per call by [`fetch_with_timeout`], so the
/// client itself carries no overall timeout.
///
/// # Example
///
/// ```no_run
/// use subdomain_census::config::UserAgentConfig;
/// use subdomain_census::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "SubdomainCensus".to_string(),
///     crawler_version: "0.1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the user agent as `Name/Version (+ContactURL)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_url
    )
}

/// Sends a GET request, giving up once `timeout` elapses
///
/// The request and the timer race; whichever finishes first decides the
/// outcome and the other is dropped. Dropping the request future aborts the
/// connection, so a timed-out request does not keep its socket alive.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Wall-clock budget until response headers arrive
pub async fn fetch_with_timeout(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<Response, FetchError> {
    tokio::select! {
        result = client.get(url).send() => result.map_err(|source| classify_error(url, source)),
        _ = tokio::time::sleep(timeout) => Err(FetchError::Timeout {
            url: url.to_string(),
        }),
    }
}

fn classify_error(url: &str, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source,
        }
    }
}
