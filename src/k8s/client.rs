use crate::{Result, SdError};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::PostParams;
use kube::{Api, Client};
use tracing::{debug, info};

/// Namespaced ConfigMap operations needed by the ConfigMap sink
#[async_trait]
pub trait ConfigMapStore: Send + Sync {
    async fn get(&self, namespace: &str, name: &str) -> Result<ConfigMap>;

    async fn create(&self, namespace: &str, config_map: &ConfigMap) -> Result<ConfigMap>;

    async fn replace(&self, namespace: &str, config_map: &ConfigMap) -> Result<ConfigMap>;
}

pub struct K8sClient {
    client: Client,
}

impl K8sClient {
    pub async fn try_default() -> Result<Self> {
        debug!("Initializing Kubernetes client");

        let client = Client::try_default().await.map_err(|e| {
            SdError::KubernetesError(format!("Failed to create K8s client: {}", e))
        })?;

        info!("Successfully connected to Kubernetes cluster");

        Ok(Self { client })
    }

    pub fn config_maps(&self, namespace: &str) -> Api<ConfigMap> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

fn config_map_name(config_map: &ConfigMap) -> &str {
    config_map.metadata.name.as_deref().unwrap_or_default()
}

#[async_trait]
impl ConfigMapStore for K8sClient {
    async fn get(&self, namespace: &str, name: &str) -> Result<ConfigMap> {
        self.config_maps(namespace).get(name).await.map_err(|e| {
            SdError::ConfigMapError(format!(
                "Failed to get configmap {}/{}: {}",
                namespace, name, e
            ))
        })
    }

    async fn create(&self, namespace: &str, config_map: &ConfigMap) -> Result<ConfigMap> {
        self.config_maps(namespace)
            .create(&PostParams::default(), config_map)
            .await
            .map_err(|e| {
                SdError::ConfigMapError(format!(
                    "error creating configmap {}/{}: {}",
                    namespace,
                    config_map_name(config_map),
                    e
                ))
            })
    }

    async fn replace(&self, namespace: &str, config_map: &ConfigMap) -> Result<ConfigMap> {
        let name = config_map_name(config_map);

        self.config_maps(namespace)
            .replace(name, &PostParams::default(), config_map)
            .await
            .map_err(|e| {
                SdError::ConfigMapError(format!(
                    "error updating configmap {}/{}: {}",
                    namespace, name, e
                ))
            })
    }
}
