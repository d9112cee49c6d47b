//! Director backed by an inventory file
//!
//! Reads a YAML document with `deployments` and `tasks` on every call, so an
//! external process can refresh the file between collection cycles.

use super::{Director, TasksFilter};
use crate::{Result, SdError};
use async_trait::async_trait;
use bosh_sd_common::{DeploymentInfo, Task};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
struct Inventory {
    #[serde(default)]
    deployments: Vec<DeploymentInfo>,
    #[serde(default)]
    tasks: Vec<Task>,
}

pub struct InventoryDirector {
    path: PathBuf,
}

impl InventoryDirector {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn load(&self) -> Result<Inventory> {
        debug!("Reading inventory from {}", self.path.display());

        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SdError::DirectorError(format!(
                "Failed to read inventory {}: {}",
                self.path.display(),
                e
            ))
        })?;

        serde_yaml::from_str(&raw).map_err(|e| {
            SdError::DirectorError(format!(
                "Failed to decode inventory {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl Director for InventoryDirector {
    async fn current_tasks(&self, filter: &TasksFilter) -> Result<Vec<Task>> {
        let inventory = self.load().await?;

        Ok(inventory
            .tasks
            .into_iter()
            .filter(|task| filter.matches(task))
            .collect())
    }

    async fn find_deployment(&self, name: &str) -> Result<DeploymentInfo> {
        self.load()
            .await?
            .deployments
            .into_iter()
            .find(|d| d.name == name)
            .ok_or_else(|| SdError::DirectorError(format!("Deployment `{}` not found", name)))
    }

    async fn deployments(&self) -> Result<Vec<DeploymentInfo>> {
        Ok(self.load().await?.deployments)
    }
}
