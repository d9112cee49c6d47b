use crate::cli::{Commands, Overrides};
use crate::config::{Config, SinkConfig, DEFAULT_SD_FILENAME};
use crate::cycle::{Cycle, CycleOutcome};
use crate::director::InventoryDirector;
use crate::k8s::{ConfigMapStore, K8sClient};
use crate::metrics::PrometheusExporter;
use crate::Result;
use prometheus::Registry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

const DEFAULT_CONFIGMAP_NAMESPACE: &str = "default";

pub async fn handle_command(command: Commands, config: Config) -> Result<()> {
    let cycle = build_cycle(&config).await?;

    match command {
        Commands::Run => cycle.run(config.interval()).await,
        Commands::Once { print_metrics } => handle_once(&cycle, print_metrics).await,
    }
}

/// Layers command-line overrides on top of `config`
pub fn apply_overrides(mut config: Config, overrides: Overrides) -> Result<Config> {
    if let Some(deployments) = overrides.deployments {
        config.deployments = deployments;
    }
    if let Some(azs) = overrides.azs {
        config.azs = azs;
    }
    if let Some(cidrs) = overrides.cidrs {
        config.cidrs = cidrs;
    }
    if let Some(processes) = overrides.processes {
        config.processes = processes;
    }
    if let Some(limit) = overrides.queued_task_limit {
        config.queued_task_limit = limit;
    }
    if let Some(path) = overrides.inventory_path {
        config.inventory_path = path;
    }
    if let Some(interval) = overrides.interval_secs {
        config.interval_secs = interval;
    }

    config.sink = override_sink(
        config.sink,
        overrides.sd_configmap,
        overrides.sd_configmap_namespace,
        overrides.sd_filename,
    );

    config.validate()?;
    Ok(config)
}

/// An existing ConfigMap sink keeps the fields no flag overrides, and takes
/// the file name of `filename` as its key.
fn override_sink(
    sink: SinkConfig,
    configmap: Option<String>,
    namespace: Option<String>,
    filename: Option<PathBuf>,
) -> SinkConfig {
    let key = filename
        .as_deref()
        .and_then(Path::file_name)
        .map(|file| file.to_string_lossy().into_owned());

    match (sink, configmap) {
        (
            SinkConfig::ConfigMap {
                namespace: current_namespace,
                name: current_name,
                key: current_key,
            },
            name,
        ) => SinkConfig::ConfigMap {
            namespace: namespace.unwrap_or(current_namespace),
            name: name.unwrap_or(current_name),
            key: key.unwrap_or(current_key),
        },
        (SinkConfig::File { .. }, Some(name)) => SinkConfig::ConfigMap {
            namespace: namespace.unwrap_or_else(|| DEFAULT_CONFIGMAP_NAMESPACE.to_string()),
            name,
            key: key.unwrap_or_else(|| DEFAULT_SD_FILENAME.to_string()),
        },
        (SinkConfig::File { path }, None) => SinkConfig::File {
            path: filename.unwrap_or(path),
        },
    }
}

async fn build_cycle(config: &Config) -> Result<Cycle> {
    let director = Arc::new(InventoryDirector::new(&config.inventory_path));

    let store: Option<Arc<dyn ConfigMapStore>> = match config.sink {
        SinkConfig::ConfigMap { .. } => Some(Arc::new(K8sClient::try_default().await?)),
        SinkConfig::File { .. } => None,
    };

    Cycle::from_config(config, director, store)
}

async fn handle_once(cycle: &Cycle, print_metrics: bool) -> Result<()> {
    match cycle.run_once().await? {
        CycleOutcome::Published { deployments } => {
            info!("Published target groups for {} deployments", deployments);
        }
        CycleOutcome::Throttled => info!("Director busy, nothing published"),
    }

    if print_metrics {
        let registry = Registry::new();
        registry.register(Box::new(cycle.collector().metrics().clone()))?;
        print!("{}", PrometheusExporter::new(registry).format_metrics()?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_map_config() -> Config {
        Config::from_yaml(
            r#"
sink:
  kind: config_map
  namespace: monitoring
  name: sd
  key: targets.json
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let overrides = Overrides {
            deployments: Some(vec!["cf".to_string()]),
            queued_task_limit: Some(10),
            sd_filename: Some(PathBuf::from("/tmp/targets.json")),
            ..Default::default()
        };

        let config = apply_overrides(Config::default(), overrides).unwrap();
        assert_eq!(config.deployments, vec!["cf"]);
        assert_eq!(config.queued_task_limit, 10);
        assert_eq!(
            config.sink,
            SinkConfig::File {
                path: PathBuf::from("/tmp/targets.json")
            }
        );
    }

    #[test]
    fn test_configmap_override_uses_filename_as_key() {
        let overrides = Overrides {
            sd_configmap: Some("bosh-target-groups".to_string()),
            sd_configmap_namespace: Some("monitoring".to_string()),
            sd_filename: Some(PathBuf::from("/etc/prometheus/bosh.json")),
            ..Default::default()
        };

        let config = apply_overrides(Config::default(), overrides).unwrap();
        assert_eq!(
            config.sink,
            SinkConfig::ConfigMap {
                namespace: "monitoring".to_string(),
                name: "bosh-target-groups".to_string(),
                key: "bosh.json".to_string(),
            }
        );
    }

    #[test]
    fn test_configmap_override_defaults_to_default_namespace() {
        let overrides = Overrides {
            sd_configmap: Some("sd".to_string()),
            ..Default::default()
        };

        let config = apply_overrides(Config::default(), overrides).unwrap();
        assert_eq!(
            config.sink,
            SinkConfig::ConfigMap {
                namespace: "default".to_string(),
                name: "sd".to_string(),
                key: DEFAULT_SD_FILENAME.to_string(),
            }
        );
    }

    #[test]
    fn test_configmap_override_keeps_configured_namespace_and_key() {
        let overrides = Overrides {
            sd_configmap: Some("other".to_string()),
            ..Default::default()
        };

        let config = apply_overrides(config_map_config(), overrides).unwrap();
        assert_eq!(
            config.sink,
            SinkConfig::ConfigMap {
                namespace: "monitoring".to_string(),
                name: "other".to_string(),
                key: "targets.json".to_string(),
            }
        );
    }

    #[test]
    fn test_filename_override_sets_configured_configmap_key() {
        let overrides = Overrides {
            sd_filename: Some(PathBuf::from("/etc/p/bosh.json")),
            ..Default::default()
        };

        let config = apply_overrides(config_map_config(), overrides).unwrap();
        assert_eq!(
            config.sink,
            SinkConfig::ConfigMap {
                namespace: "monitoring".to_string(),
                name: "sd".to_string(),
                key: "bosh.json".to_string(),
            }
        );
    }

    #[test]
    fn test_overrides_are_validated() {
        let overrides = Overrides {
            interval_secs: Some(0),
            ..Default::default()
        };
        assert!(apply_overrides(Config::default(), overrides).is_err());
    }
}
