//! Target-group publishing
//!
//! Aggregates the selected deployments, publishes the result to the
//! configured target and records the scrape gauges whether or not the
//! publish succeeded.

use super::groups::{create_target_groups, SelectorFilters, TargetGroup};
use super::target::PublishTarget;
use crate::metrics::ScrapeMetrics;
use crate::Result;
use bosh_sd_common::DeploymentInfo;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::debug;

pub struct ServiceDiscoveryCollector {
    filters: SelectorFilters,
    target: Box<dyn PublishTarget>,
    metrics: ScrapeMetrics,
    publish_lock: Mutex<()>,
}

impl ServiceDiscoveryCollector {
    pub fn new(
        filters: SelectorFilters,
        target: Box<dyn PublishTarget>,
        metrics: ScrapeMetrics,
    ) -> Self {
        Self {
            filters,
            target,
            metrics,
            publish_lock: Mutex::new(()),
        }
    }

    pub fn metrics(&self) -> &ScrapeMetrics {
        &self.metrics
    }

    pub fn target(&self) -> &dyn PublishTarget {
        self.target.as_ref()
    }

    /// Aggregates `deployments` and publishes the resulting target groups
    pub async fn collect(&self, deployments: &[DeploymentInfo]) -> Result<()> {
        let begun = Instant::now();
        let target_groups = self.target_groups(deployments);

        self.publish_since(&target_groups, begun).await
    }

    pub fn target_groups(&self, deployments: &[DeploymentInfo]) -> Vec<TargetGroup> {
        create_target_groups(self.filters.create_label_groups(deployments))
    }

    pub async fn publish(&self, target_groups: &[TargetGroup]) -> Result<()> {
        self.publish_since(target_groups, Instant::now()).await
    }

    async fn publish_since(&self, target_groups: &[TargetGroup], begun: Instant) -> Result<()> {
        let _guard = self.publish_lock.lock().await;

        let result = self.write(target_groups).await;
        self.metrics.record(begun);

        result
    }

    async fn write(&self, target_groups: &[TargetGroup]) -> Result<()> {
        let payload = serde_json::to_vec(target_groups)?;
        self.target.publish(&payload).await?;

        debug!(
            "Published {} target groups to {}",
            target_groups.len(),
            self.target
        );
        Ok(())
    }
}
