//! Domain record loading
//!
//! Each subdomain is described by one `<name>.json` file. The loader reads
//! every such file from the configured directory, validates it against
//! [`schema::DomainRecord`] and derives the fully-qualified hostname from the
//! file stem.

pub mod schema;

pub use schema::{DnsRecords, DomainRecord, Owner};

use crate::crawler::{CrawlSource, Target};
use crate::{RecordError, RecordResult};
use std::path::{Path, PathBuf};

/// A validated record together with where it came from
#[derive(Debug, Clone)]
pub struct DomainFile {
    /// Fully-qualified hostname, e.g. `alice.is-a.dev`
    pub domain: String,

    /// The file the record was read from
    pub path: PathBuf,

    pub record: DomainRecord,
}

impl DomainFile {
    /// Builds the crawl target for this domain, if it serves anything
    pub fn crawl_target(&self) -> Option<Target> {
        let records = &self.record.records;
        if !records.is_crawlable() {
            return None;
        }

        let source = match &records.cname {
            Some(cname) => CrawlSource::Cname(cname.clone()),
            None => CrawlSource::Address,
        };

        Some(Target {
            host: self.domain.clone(),
            owner: self.record.owner.username.clone(),
            source,
        })
    }
}

/// Loads every `*.json` record in `dir`
///
/// Files are returned sorted by name. Any unreadable or invalid file aborts
/// the load, since rankings over a partial set would be misleading.
///
/// # Arguments
///
/// * `dir` - Directory holding the record files
/// * `suffix` - Parent domain appended to each file stem
pub fn load_domains(dir: &Path, suffix: &str) -> RecordResult<Vec<DomainFile>> {
    let entries = std::fs::read_dir(dir).map_err(|source| RecordError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| RecordError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut domains = Vec::with_capacity(paths.len());
    for path in paths {
        domains.push(load_domain(&path, suffix)?);
    }

    tracing::info!("Loaded {} domain records from {}", domains.len(), dir.display());
    Ok(domains)
}

/// Loads and validates a single record file
pub fn load_domain(path: &Path, suffix: &str) -> RecordResult<DomainFile> {
    let content = std::fs::read_to_string(path).map_err(|source| RecordError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let record: DomainRecord =
        serde_json::from_str(&content).map_err(|source| RecordError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    record
        .records
        .validate()
        .map_err(|message| RecordError::Invalid {
            path: path.to_path_buf(),
            message,
        })?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| RecordError::Invalid {
            path: path.to_path_buf(),
            message: "file name is not valid UTF-8".to_string(),
        })?;

    Ok(DomainFile {
        domain: format!("{}.{}", stem, suffix),
        path: path.to_path_buf(),
        record,
    })
}

/// Collects the crawl targets, preserving record order
pub fn crawl_targets(domains: &[DomainFile]) -> Vec<Target> {
    domains.iter().filter_map(DomainFile::crawl_target).collect()
}
