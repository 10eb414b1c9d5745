//! Ownership and hosting-provider rankings
//!
//! Both rankings are plain counts sorted descending; ties are broken by
//! name so repeated runs over the same records produce identical output.

mod services;

pub use services::{classify_service, OTHER};

use crate::records::DomainFile;
use serde::Serialize;
use std::collections::HashMap;

/// Number of domains registered by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsernameCount {
    pub username: String,
    pub count: u64,
}

/// Number of domains pointed at one hosting provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCount {
    pub name: String,
    pub count: u64,
}

/// Ranks owners by how many domains they hold
pub fn rank_usernames(domains: &[DomainFile]) -> Vec<UsernameCount> {
    let counts = count_by(domains.iter().map(|d| d.record.owner.username.as_str()));

    counts
        .into_iter()
        .map(|(username, count)| UsernameCount {
            username: username.to_string(),
            count,
        })
        .collect()
}

/// Ranks hosting providers by how many domains point at them
///
/// Domains whose name starts with `_` (verification and service records)
/// are left out. Domains without a CNAME count as [`OTHER`].
pub fn rank_services(domains: &[DomainFile]) -> Vec<ServiceCount> {
    let services = domains
        .iter()
        .filter(|d| !d.domain.starts_with('_'))
        .map(|d| match &d.record.records.cname {
            Some(cname) => classify_service(cname),
            None => OTHER,
        });

    count_by(services)
        .into_iter()
        .map(|(name, count)| ServiceCount {
            name: name.to_string(),
            count,
        })
        .collect()
}

/// Counts occurrences and sorts by count descending, then key ascending
fn count_by<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(&'a str, u64)> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
}
