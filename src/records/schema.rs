//! On-disk shape of a domain record
//!
//! Unknown keys are tolerated at the top level and inside `owner`, but the
//! `records` table and every nested record object reject them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::net::IpAddr;
use url::Url;

/// Hostname pattern required inside CNAME, NS and SRV targets
static DOMAIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,63}\b")
        .expect("hostname pattern is a valid regex")
});

/// A single subdomain registration
#[derive(Debug, Clone, Deserialize)]
pub struct DomainRecord {
    pub owner: Owner,
    pub records: DnsRecords,
    #[serde(default)]
    pub proxied: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    pub username: String,
}

/// DNS records requested for the subdomain
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DnsRecords {
    #[serde(rename = "A")]
    pub a: Option<Vec<IpAddr>>,
    #[serde(rename = "AAAA")]
    pub aaaa: Option<Vec<IpAddr>>,
    #[serde(rename = "CAA")]
    pub caa: Option<Vec<CaaRecord>>,
    #[serde(rename = "CNAME")]
    pub cname: Option<String>,
    #[serde(rename = "DS")]
    pub ds: Option<Vec<DsRecord>>,
    #[serde(rename = "MX")]
    pub mx: Option<Vec<MxRecord>>,
    #[serde(rename = "NS")]
    pub ns: Option<Vec<String>>,
    #[serde(rename = "SRV")]
    pub srv: Option<Vec<SrvRecord>>,
    #[serde(rename = "TLSA")]
    pub tlsa: Option<Vec<TlsaRecord>>,
    #[serde(rename = "TXT")]
    pub txt: Option<TxtRecord>,
    #[serde(rename = "URL")]
    pub url: Option<Url>,
}

// Numeric fields accept any JSON number, fractional or negative.

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaaRecord {
    pub flags: f64,
    pub tag: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DsRecord {
    pub key_tag: f64,
    pub algorithm: f64,
    pub digest_type: f64,
    pub digest: String,
}

/// MX entries come either as a bare target or as `{target, priority}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MxRecord {
    Target(String),
    Prioritized(PrioritizedMx),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrioritizedMx {
    pub target: String,
    pub priority: f64,
}

impl MxRecord {
    pub fn target(&self) -> &str {
        match self {
            Self::Target(target) => target,
            Self::Prioritized(mx) => &mx.target,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SrvRecord {
    pub priority: f64,
    pub weight: f64,
    pub port: f64,
    pub target: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TlsaRecord {
    pub usage: f64,
    pub selector: f64,
    pub matching_type: f64,
    pub certificate: String,
}

/// TXT is accepted as a single string or a list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TxtRecord {
    Single(String),
    Many(Vec<String>),
}

impl DnsRecords {
    /// Whether the subdomain points at something that serves HTTP
    ///
    /// Presence of the record is what counts, even an empty address list.
    /// NS delegations are not followed.
    pub fn is_crawlable(&self) -> bool {
        self.cname.is_some() || self.a.is_some() || self.aaaa.is_some()
    }

    /// Checks the hostname-valued fields serde cannot type
    pub fn validate(&self) -> Result<(), String> {
        if let Some(cname) = &self.cname {
            check_hostname("CNAME", cname)?;
        }
        for ns in self.ns.iter().flatten() {
            check_hostname("NS", ns)?;
        }
        for srv in self.srv.iter().flatten() {
            check_hostname("SRV target", &srv.target)?;
        }
        Ok(())
    }
}

fn check_hostname(field: &str, value: &str) -> Result<(), String> {
    if DOMAIN_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(format!("{} '{}' is not a hostname", field, value))
    }
}
