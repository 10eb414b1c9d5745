use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for the census
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl pool behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Number of concurrent workers draining the queue
    pub concurrency: usize,

    /// Wall-clock budget for a single request (milliseconds)
    pub request_timeout_ms: u64,

    /// Maximum number of body bytes read per response
    pub body_limit_bytes: usize,

    /// Request URL template; `{host}` is replaced by the target hostname
    pub url_template: String,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Builds the request URL for a hostname
    pub fn url_for(&self, host: &str) -> String {
        self.url_template.replace("{host}", host)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            request_timeout_ms: 20_000,
            body_limit_bytes: 10_000,
            url_template: "https://{host}".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

/// Where domain records are read from
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct InputConfig {
    /// Directory holding one `<name>.json` record per subdomain
    pub domains_dir: PathBuf,

    /// Parent domain appended to every record's file stem
    pub domain_suffix: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            domains_dir: PathBuf::from("./.iad/domains"),
            domain_suffix: "is-a.dev".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Path of the JSON report written at the end of the run
    pub data_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./.data/data.json"),
        }
    }
}
