//! The persisted census report

use crate::crawler::SiteSummaries;
use crate::ranking::{rank_services, rank_usernames, ServiceCount, UsernameCount};
use crate::records::DomainFile;
use crate::CensusError;
use serde::Serialize;
use std::path::Path;

/// Everything written to the data file at the end of a run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CensusReport {
    pub services_ranked: Vec<ServiceCount>,
    pub usernames_ranked: Vec<UsernameCount>,
    pub site_summaries: SiteSummaries,
}

impl CensusReport {
    /// Computes both rankings; site summaries start empty
    pub fn from_domains(domains: &[DomainFile]) -> Self {
        Self {
            services_ranked: rank_services(domains),
            usernames_ranked: rank_usernames(domains),
            site_summaries: SiteSummaries::new(),
        }
    }

    pub fn with_site_summaries(mut self, summaries: SiteSummaries) -> Self {
        self.site_summaries = summaries;
        self
    }

    pub fn to_json(&self) -> Result<String, CensusError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Writes the report as compact JSON, creating parent directories
///
/// # Arguments
///
/// * `report` - The finished report
/// * `path` - Destination file, replaced if it exists
pub fn write_report(report: &CensusReport, path: &Path) -> Result<(), CensusError> {
    let json = report.to_json()?;

    let io_err = |source| CensusError::Report {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, json).map_err(io_err)?;

    tracing::info!("Wrote report to {}", path.display());
    Ok(())
}
