//! In-memory fakes for unit tests

use crate::director::{Director, TasksFilter};
use crate::k8s::ConfigMapStore;
use crate::{Result, SdError};
use async_trait::async_trait;
use bosh_sd_common::{DeploymentInfo, Task, TaskState};
use k8s_openapi::api::core::v1::ConfigMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeDirector {
    pub deployments: Vec<DeploymentInfo>,
    pub queued_tasks: usize,
    pub fail_tasks: bool,
    pub fail_listing: bool,
    pub missing: Vec<String>,
    pub find_calls: Mutex<Vec<String>>,
}

impl FakeDirector {
    pub fn with_deployments(deployments: Vec<DeploymentInfo>) -> Self {
        Self {
            deployments,
            ..Default::default()
        }
    }

    pub fn find_calls(&self) -> Vec<String> {
        self.find_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Director for FakeDirector {
    async fn current_tasks(&self, filter: &TasksFilter) -> Result<Vec<Task>> {
        if self.fail_tasks {
            return Err(SdError::DirectorError("tasks unavailable".to_string()));
        }
        assert_eq!(filter, &TasksFilter::queued());

        Ok((0..self.queued_tasks as u64)
            .map(|id| Task {
                id,
                state: TaskState::Queued,
                deployment: None,
                description: String::new(),
            })
            .collect())
    }

    async fn find_deployment(&self, name: &str) -> Result<DeploymentInfo> {
        self.find_calls.lock().unwrap().push(name.to_string());

        if self.missing.iter().any(|m| m == name) {
            return Err(SdError::DirectorError("deployment does not exist".to_string()));
        }

        self.deployments
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .ok_or_else(|| SdError::DirectorError("deployment does not exist".to_string()))
    }

    async fn deployments(&self) -> Result<Vec<DeploymentInfo>> {
        if self.fail_listing {
            return Err(SdError::DirectorError("no deployments".to_string()));
        }
        Ok(self.deployments.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Get(String, String),
    Create(ConfigMap),
    Replace(ConfigMap),
}

#[derive(Default)]
pub struct FakeConfigMapStore {
    pub existing: Option<ConfigMap>,
    pub fail_create: bool,
    pub fail_replace: bool,
    pub calls: Mutex<Vec<StoreCall>>,
}

impl FakeConfigMapStore {
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfigMapStore for FakeConfigMapStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<ConfigMap> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Get(namespace.to_string(), name.to_string()));

        self.existing
            .clone()
            .ok_or_else(|| SdError::ConfigMapError("error getting configmap".to_string()))
    }

    async fn create(&self, _namespace: &str, config_map: &ConfigMap) -> Result<ConfigMap> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Create(config_map.clone()));

        if self.fail_create {
            return Err(SdError::ConfigMapError("error creating configmap".to_string()));
        }
        Ok(config_map.clone())
    }

    async fn replace(&self, _namespace: &str, config_map: &ConfigMap) -> Result<ConfigMap> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Replace(config_map.clone()));

        if self.fail_replace {
            return Err(SdError::ConfigMapError("error updating configmap".to_string()));
        }
        Ok(config_map.clone())
    }
}
