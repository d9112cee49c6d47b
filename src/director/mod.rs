//! BOSH director capability
//!
//! The collector only needs three questions answered by the director: which
//! tasks are queued, which deployments exist, and what a named deployment
//! looks like. Retry and timeout policy belong to implementations.

pub mod inventory;

use crate::Result;
use async_trait::async_trait;
use bosh_sd_common::{DeploymentInfo, Task, TaskState};

pub use inventory::InventoryDirector;

/// Selects which tasks `Director::current_tasks` reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TasksFilter {
    /// Include tasks of every deployment, not just the current one
    pub all: bool,
    /// Only report tasks in one of these states; empty means any state
    pub states: Vec<TaskState>,
}

impl TasksFilter {
    pub fn queued() -> Self {
        Self {
            all: true,
            states: vec![TaskState::Queued],
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.states.is_empty() || self.states.contains(&task.state)
    }
}

#[async_trait]
pub trait Director: Send + Sync {
    async fn current_tasks(&self, filter: &TasksFilter) -> Result<Vec<Task>>;

    async fn find_deployment(&self, name: &str) -> Result<DeploymentInfo>;

    async fn deployments(&self) -> Result<Vec<DeploymentInfo>>;
}
