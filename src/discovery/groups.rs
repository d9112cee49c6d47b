//! Target group aggregation
//!
//! Instances are grouped by `(deployment, process)`. Each surviving instance
//! contributes one address, chosen by the CIDR filter, to every group its
//! processes belong to.

use crate::filters::{AzsFilter, CidrFilter, ProcessFilter};
use bosh_sd_common::DeploymentInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BOSH_DEPLOYMENT_NAME_LABEL: &str = "__meta_bosh_deployment";
pub const BOSH_JOB_PROCESS_NAME_LABEL: &str = "__meta_bosh_job_process_name";

/// Grouping key; ordering is by deployment name, then process name
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct LabelGroupKey {
    pub deployment_name: String,
    pub process_name: String,
}

impl LabelGroupKey {
    pub fn labels(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (
                BOSH_DEPLOYMENT_NAME_LABEL.to_string(),
                self.deployment_name.clone(),
            ),
            (
                BOSH_JOB_PROCESS_NAME_LABEL.to_string(),
                self.process_name.clone(),
            ),
        ])
    }
}

/// Addresses per key. A `BTreeMap` so iteration, and therefore the
/// published document, is identical across runs for identical input.
pub type LabelGroups = BTreeMap<LabelGroupKey, Vec<String>>;

/// Prometheus file/ConfigMap service discovery entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroup {
    pub targets: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// The three per-instance selection filters
#[derive(Debug, Clone)]
pub struct SelectorFilters {
    pub azs: AzsFilter,
    pub processes: ProcessFilter,
    pub cidrs: CidrFilter,
}

impl SelectorFilters {
    pub fn new(azs: AzsFilter, processes: ProcessFilter, cidrs: CidrFilter) -> Self {
        Self {
            azs,
            processes,
            cidrs,
        }
    }

    /// Builds label groups from the selected deployments.
    ///
    /// An instance without an address inside the configured networks, or in a
    /// disabled zone, is skipped as a whole. A disabled process only drops
    /// that process.
    pub fn create_label_groups(&self, deployments: &[DeploymentInfo]) -> LabelGroups {
        let mut label_groups = LabelGroups::new();

        for deployment in deployments {
            for instance in &deployment.instances {
                let ip = match self.cidrs.select(&instance.ips) {
                    Some(ip) if self.azs.enabled(&instance.az) => ip,
                    _ => continue,
                };

                for process in &instance.processes {
                    if !self.processes.enabled(&process.name) {
                        continue;
                    }

                    let key = LabelGroupKey {
                        deployment_name: deployment.name.clone(),
                        process_name: process.name.clone(),
                    };
                    label_groups.entry(key).or_default().push(ip.clone());
                }
            }
        }

        label_groups
    }
}

/// One target group per key, in key order
pub fn create_target_groups(label_groups: LabelGroups) -> Vec<TargetGroup> {
    label_groups
        .into_iter()
        .filter(|(_, targets)| !targets.is_empty())
        .map(|(key, targets)| TargetGroup {
            labels: key.labels(),
            targets,
        })
        .collect()
}
