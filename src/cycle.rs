//! Collection cycle driver
//!
//! Selection completes before aggregation starts, and aggregation completes
//! before publishing starts. Overlapping cycles share only the collector,
//! whose publish step is serialized.

use crate::config::{Config, SinkConfig};
use crate::director::Director;
use crate::discovery::{
    ConfigMapTarget, FileTarget, PublishTarget, SelectorFilters, ServiceDiscoveryCollector,
};
use crate::filters::{AzsFilter, CidrFilter, DeploymentsFilter, ProcessFilter, Selection};
use crate::k8s::ConfigMapStore;
use crate::metrics::ScrapeMetrics;
use crate::{Result, SdError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The director was too busy; the previous publication stays in place
    Throttled,
    Published { deployments: usize },
}

pub struct Cycle {
    selector: DeploymentsFilter,
    collector: Arc<ServiceDiscoveryCollector>,
}

impl Cycle {
    pub fn new(selector: DeploymentsFilter, collector: Arc<ServiceDiscoveryCollector>) -> Self {
        Self {
            selector,
            collector,
        }
    }

    /// Wires a cycle from configuration.
    ///
    /// `store` is required when the configuration selects the ConfigMap sink.
    pub fn from_config(
        config: &Config,
        director: Arc<dyn Director>,
        store: Option<Arc<dyn ConfigMapStore>>,
    ) -> Result<Self> {
        let filters = SelectorFilters::new(
            AzsFilter::new(&config.azs),
            ProcessFilter::new(&config.processes)?,
            CidrFilter::new(&config.cidrs)?,
        );

        let target: Box<dyn PublishTarget> = match (&config.sink, store) {
            (SinkConfig::File { path }, _) => Box::new(FileTarget::new(path)),
            (SinkConfig::ConfigMap { namespace, name, key }, Some(store)) => Box::new(
                ConfigMapTarget::new(store, namespace.as_str(), name.as_str(), key.as_str()),
            ),
            (SinkConfig::ConfigMap { .. }, None) => {
                return Err(SdError::ConfigError(
                    "configmap sink selected without a Kubernetes client".to_string(),
                ))
            }
        };

        let metrics = ScrapeMetrics::new(&config.metrics_namespace, &config.director_labels())?;
        let collector = ServiceDiscoveryCollector::new(filters, target, metrics);
        let selector = DeploymentsFilter::new(
            config.deployments.clone(),
            director,
            config.queued_task_limit,
        );

        Ok(Self::new(selector, Arc::new(collector)))
    }

    pub fn collector(&self) -> &Arc<ServiceDiscoveryCollector> {
        &self.collector
    }

    /// Runs one cycle, logging a failure before returning it
    pub async fn run_once(&self) -> Result<CycleOutcome> {
        let outcome = self.cycle().await;
        if let Err(e) = &outcome {
            error!("Service discovery cycle failed: {}", e);
        }

        outcome
    }

    async fn cycle(&self) -> Result<CycleOutcome> {
        let deployments = match self.selector.select().await? {
            Selection::Throttled { queued } => {
                warn!(
                    "Director has {} queued tasks, keeping previous target groups",
                    queued
                );
                return Ok(CycleOutcome::Throttled);
            }
            Selection::Selected(deployments) => deployments,
        };

        self.collector.collect(&deployments).await?;

        Ok(CycleOutcome::Published {
            deployments: deployments.len(),
        })
    }

    /// Runs a cycle every `interval` until ctrl-c. Cycle errors are logged
    /// and the next tick retries.
    pub async fn run(&self, interval: Duration) -> Result<()> {
        self.run_until(interval, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Runs a cycle every `interval` until `shutdown` completes.
    ///
    /// `shutdown` lives across iterations, so a signal raised while a cycle
    /// is in flight stops the loop once that cycle ends.
    pub async fn run_until<F>(&self, interval: Duration, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Publishing target groups to {} every {:?}",
            self.collector.target(),
            interval
        );

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
                _ = ticker.tick() => {
                    if let Ok(CycleOutcome::Published { deployments }) = self.run_once().await {
                        info!("Published target groups for {} deployments", deployments);
                    }
                }
            }
        }

        Ok(())
    }
}
