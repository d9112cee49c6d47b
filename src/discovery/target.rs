//! Destinations for the serialized target groups
//!
//! Exactly one target is chosen when the collector is built: a file that is
//! replaced atomically, or a key inside a Kubernetes ConfigMap.

use crate::k8s::ConfigMapStore;
use crate::{Result, SdError};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[async_trait]
pub trait PublishTarget: fmt::Display + Send + Sync {
    async fn publish(&self, payload: &[u8]) -> Result<()>;
}

/// Writes the payload to a temp file next to `path` and renames it into place
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl fmt::Display for FileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file {}", self.path.display())
    }
}

/// Same-directory temp file, fsync, close, chmod 0644, rename.
///
/// The temp file is removed on any failure, so the destination is either the
/// previous content or the new content, never a partial write.
fn write_atomic(path: &Path, payload: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let prefix = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut file = tempfile::Builder::new()
        .prefix(&prefix)
        .tempfile_in(dir)
        .map_err(SdError::sink("create temp file"))?;

    file.write_all(payload)
        .map_err(SdError::sink("write temp file"))?;
    file.as_file()
        .sync_all()
        .map_err(SdError::sink("sync temp file"))?;

    let temp_path = file.into_temp_path();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o644))
            .map_err(SdError::sink("set temp file permissions"))?;
    }

    temp_path
        .persist(path)
        .map_err(|e| SdError::SinkFailed {
            step: "rename temp file",
            source: e.error,
        })
}

#[async_trait]
impl PublishTarget for FileTarget {
    async fn publish(&self, payload: &[u8]) -> Result<()> {
        let path = self.path.clone();
        let payload = payload.to_vec();

        tokio::task::spawn_blocking(move || write_atomic(&path, &payload))
            .await
            .map_err(|e| SdError::IoError(std::io::Error::other(e)))?
    }
}

/// Stores the payload under `key` in a namespaced ConfigMap
pub struct ConfigMapTarget {
    store: Arc<dyn ConfigMapStore>,
    namespace: String,
    name: String,
    key: String,
}

impl ConfigMapTarget {
    pub fn new(
        store: Arc<dyn ConfigMapStore>,
        namespace: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            name: name.into(),
            key: key.into(),
        }
    }

    fn config_map(&self, payload: String, resource_version: Option<String>) -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                namespace: Some(self.namespace.clone()),
                resource_version,
                ..Default::default()
            },
            data: Some(BTreeMap::from([(self.key.clone(), payload)])),
            ..Default::default()
        }
    }
}

impl fmt::Display for ConfigMapTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "configmap {}/{}", self.namespace, self.name)
    }
}

#[async_trait]
impl PublishTarget for ConfigMapTarget {
    /// Creates the ConfigMap when it cannot be read, otherwise replaces it.
    ///
    /// The replacement carries the resource version that was read, so a
    /// concurrent writer makes this update fail rather than being overwritten.
    async fn publish(&self, payload: &[u8]) -> Result<()> {
        let payload = String::from_utf8_lossy(payload).into_owned();

        match self.store.get(&self.namespace, &self.name).await {
            Err(e) => {
                debug!("Could not read {}, creating it: {}", self, e);
                self.store
                    .create(&self.namespace, &self.config_map(payload, None))
                    .await?;
            }
            Ok(existing) => {
                let resource_version = existing.metadata.resource_version;
                self.store
                    .replace(&self.namespace, &self.config_map(payload, resource_version))
                    .await?;
            }
        }

        Ok(())
    }
}
