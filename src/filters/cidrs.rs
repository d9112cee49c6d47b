use crate::{Result, SdError};
use ipnet::IpNet;
use std::net::IpAddr;

/// Picks the address an instance is scraped on
#[derive(Debug, Clone)]
pub struct CidrFilter {
    networks: Vec<IpNet>,
}

impl CidrFilter {
    pub fn new<S: AsRef<str>>(cidrs: &[S]) -> Result<Self> {
        let networks = cidrs
            .iter()
            .map(|cidr| {
                let cidr: &str = cidr.as_ref();
                let cidr = cidr.trim();
                cidr.parse::<IpNet>().map_err(|e| SdError::InvalidCidr {
                    cidr: cidr.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { networks })
    }

    /// Returns the first candidate address inside any configured network.
    ///
    /// Candidates are tried in order; unparseable entries are skipped.
    pub fn select<S: AsRef<str>>(&self, ips: &[S]) -> Option<String> {
        ips.iter().find_map(|raw| {
            let raw: &str = raw.as_ref();
            let raw = raw.trim();
            let ip = raw.parse::<IpAddr>().ok()?;
            self.networks
                .iter()
                .any(|net| net.contains(&ip))
                .then(|| raw.to_string())
        })
    }
}
