//! Deployment selection for one collection cycle
//!
//! Selection is skipped entirely while the director's task queue is deeper
//! than the configured limit. Publishing stale but consistent targets is
//! preferred over publishing a partial view while the director is busy.

use crate::director::{Director, TasksFilter};
use crate::SdError;
use bosh_sd_common::DeploymentInfo;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Selection failure carrying the deployments discovered before it occurred
#[derive(Error, Debug)]
#[error("{source}")]
pub struct SelectError {
    pub discovered: Vec<DeploymentInfo>,
    #[source]
    pub source: SdError,
}

impl From<SelectError> for SdError {
    fn from(err: SelectError) -> Self {
        err.source
    }
}

/// Outcome of a selection that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The director's queue was over the limit; nothing should be published
    Throttled { queued: usize },
    Selected(Vec<DeploymentInfo>),
}

impl Selection {
    pub fn into_deployments(self) -> Vec<DeploymentInfo> {
        match self {
            Selection::Throttled { .. } => Vec::new(),
            Selection::Selected(deployments) => deployments,
        }
    }
}

pub struct DeploymentsFilter {
    filters: Vec<String>,
    director: Arc<dyn Director>,
    queued_task_limit: usize,
}

impl DeploymentsFilter {
    pub fn new(
        filters: Vec<String>,
        director: Arc<dyn Director>,
        queued_task_limit: usize,
    ) -> Self {
        Self {
            filters,
            director,
            queued_task_limit,
        }
    }

    /// Returns the deployments visible this cycle; empty while throttled.
    ///
    /// With name filters the result follows filter order and stops at the
    /// first failed lookup; without them it follows the director's listing.
    pub async fn get_deployments(&self) -> Result<Vec<DeploymentInfo>, SelectError> {
        self.select().await.map(Selection::into_deployments)
    }

    /// Like `get_deployments`, but tells a throttled cycle apart from an
    /// empty director.
    pub async fn select(&self) -> Result<Selection, SelectError> {
        let mut deployments = Vec::new();

        if self.queued_task_limit != 0 {
            let queued = match self.director.current_tasks(&TasksFilter::queued()).await {
                Ok(tasks) => tasks.len(),
                Err(e) => {
                    warn!("Failed to read queued tasks, assuming none: {}", e);
                    0
                }
            };

            debug!(
                "Queued task limit set to `{}`, current task queue is `{}`",
                self.queued_task_limit, queued
            );

            if queued > self.queued_task_limit {
                info!(
                    "Queued tasks ({}) exceed the limit ({}), skipping this cycle",
                    queued, self.queued_task_limit
                );
                return Ok(Selection::Throttled { queued });
            }
        }

        if self.filters.is_empty() {
            debug!("Reading deployments...");
            return self
                .director
                .deployments()
                .await
                .map(Selection::Selected)
                .map_err(|e| SelectError {
                    discovered: Vec::new(),
                    source: SdError::DeploymentsListing(e.to_string()),
                });
        }

        debug!("Filtering deployments by `{:?}`...", self.filters);
        for filter in &self.filters {
            match self.director.find_deployment(filter.trim()).await {
                Ok(deployment) => deployments.push(deployment),
                Err(e) => {
                    return Err(SelectError {
                        discovered: deployments,
                        source: SdError::DeploymentLookup {
                            filter: filter.clone(),
                            reason: e.to_string(),
                        },
                    });
                }
            }
        }

        Ok(Selection::Selected(deployments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDirector;

    fn deployment(name: &str) -> DeploymentInfo {
        DeploymentInfo::new(name, Vec::new())
    }

    fn filter(
        director: FakeDirector,
        filters: &[&str],
        limit: usize,
    ) -> (Arc<FakeDirector>, DeploymentsFilter) {
        let director = Arc::new(director);
        let filters = filters.iter().map(|f| f.to_string()).collect();
        let selector = DeploymentsFilter::new(filters, director.clone(), limit);
        (director, selector)
    }

    #[tokio::test]
    async fn test_queue_over_limit_returns_nothing() {
        let mut director = FakeDirector::with_deployments(vec![deployment("cf")]);
        director.queued_tasks = 2;
        let (_, selector) = filter(director, &[], 1);

        let deployments = selector.get_deployments().await.unwrap();
        assert!(deployments.is_empty());
        assert_eq!(
            selector.select().await.unwrap(),
            Selection::Throttled { queued: 2 }
        );
    }

    #[tokio::test]
    async fn test_queue_at_limit_proceeds() {
        let mut director = FakeDirector::with_deployments(vec![deployment("cf")]);
        director.queued_tasks = 2;
        let (_, selector) = filter(director, &[], 2);

        let deployments = selector.get_deployments().await.unwrap();
        assert_eq!(deployments.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_limit_disables_breaker() {
        let mut director = FakeDirector::with_deployments(vec![deployment("cf")]);
        director.queued_tasks = 1000;
        let (_, selector) = filter(director, &[], 0);

        assert_eq!(selector.get_deployments().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_task_listing_failure_is_not_fatal() {
        let mut director = FakeDirector::with_deployments(vec![deployment("cf")]);
        director.fail_tasks = true;
        let (_, selector) = filter(director, &[], 1);

        assert_eq!(selector.get_deployments().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_filters_lists_all_in_order() {
        let director =
            FakeDirector::with_deployments(vec![deployment("b"), deployment("a"), deployment("c")]);
        let (director, selector) = filter(director, &[], 0);

        let names: Vec<_> = selector
            .get_deployments()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert!(director.find_calls().is_empty());
    }

    #[tokio::test]
    async fn test_listing_failure() {
        let director = FakeDirector {
            fail_listing: true,
            ..Default::default()
        };
        let (_, selector) = filter(director, &[], 0);

        let err = selector.get_deployments().await.unwrap_err();
        assert!(err.discovered.is_empty());
        assert!(matches!(err.source, SdError::DeploymentsListing(_)));
    }

    #[tokio::test]
    async fn test_filters_follow_filter_order() {
        let director =
            FakeDirector::with_deployments(vec![deployment("a"), deployment("b"), deployment("c")]);
        let (director, selector) = filter(director, &["c", "a"], 0);

        let names: Vec<_> = selector
            .get_deployments()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["c", "a"]);
        assert_eq!(director.find_calls(), vec!["c", "a"]);
    }

    #[tokio::test]
    async fn test_filter_whitespace_is_trimmed() {
        let director = FakeDirector::with_deployments(vec![deployment("fake-deployment-name-1")]);
        let (director, selector) = filter(director, &["   fake-deployment-name-1  "], 0);

        let deployments = selector.get_deployments().await.unwrap();
        assert_eq!(deployments, vec![deployment("fake-deployment-name-1")]);
        assert_eq!(director.find_calls(), vec!["fake-deployment-name-1"]);
    }

    #[tokio::test]
    async fn test_lookup_failure_stops_and_keeps_prefix() {
        let mut director =
            FakeDirector::with_deployments(vec![deployment("a"), deployment("c")]);
        director.missing = vec!["b".to_string()];
        let (director, selector) = filter(director, &["a", " b ", "c"], 0);

        let err = selector.get_deployments().await.unwrap_err();
        assert_eq!(err.discovered, vec![deployment("a")]);
        assert!(matches!(
            err.source,
            SdError::DeploymentLookup { ref filter, .. } if filter == " b "
        ));
        assert!(err.to_string().contains("deployment does not exist"));
        assert_eq!(director.find_calls(), vec!["a", "b"]);
    }
}
