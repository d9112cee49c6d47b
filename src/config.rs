//! Collector configuration
//!
//! Loaded from a YAML file; command-line flags override individual fields.

use crate::metrics::scrape::DirectorLabels;
use crate::{Result, SdError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SD_FILENAME: &str = "bosh_target_groups.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub metrics_namespace: String,
    pub environment: String,
    pub bosh_name: String,
    pub bosh_uuid: String,

    /// Deployment names to collect; empty collects every deployment
    pub deployments: Vec<String>,
    /// Skip a cycle while more tasks than this are queued; 0 disables
    pub queued_task_limit: usize,

    pub azs: Vec<String>,
    pub cidrs: Vec<String>,
    pub processes: Vec<String>,

    pub inventory_path: PathBuf,
    pub interval_secs: u64,

    pub sink: SinkConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkConfig {
    File {
        path: PathBuf,
    },
    ConfigMap {
        namespace: String,
        name: String,
        #[serde(default = "default_key")]
        key: String,
    },
}

fn default_key() -> String {
    DEFAULT_SD_FILENAME.to_string()
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig::File {
            path: PathBuf::from(DEFAULT_SD_FILENAME),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metrics_namespace: "bosh".to_string(),
            environment: String::new(),
            bosh_name: String::new(),
            bosh_uuid: String::new(),
            deployments: Vec::new(),
            queued_task_limit: 0,
            azs: Vec::new(),
            cidrs: vec!["0.0.0.0/0".to_string()],
            processes: Vec::new(),
            inventory_path: PathBuf::from("inventory.yml"),
            interval_secs: 60,
            sink: SinkConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SdError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(raw)
            .map_err(|e| SdError::ConfigError(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(SdError::ConfigError("interval_secs must be positive".to_string()));
        }

        match &self.sink {
            SinkConfig::File { path } if path.as_os_str().is_empty() => {
                Err(SdError::ConfigError("sink file path is empty".to_string()))
            }
            SinkConfig::ConfigMap { namespace, name, key }
                if namespace.is_empty() || name.is_empty() || key.is_empty() =>
            {
                Err(SdError::ConfigError(
                    "configmap sink needs a namespace, a name and a key".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn director_labels(&self) -> DirectorLabels {
        DirectorLabels {
            environment: self.environment.clone(),
            bosh_name: self.bosh_name.clone(),
            bosh_uuid: self.bosh_uuid.clone(),
        }
    }
}
