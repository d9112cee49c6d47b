use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdError {
    #[error("Error while reading deployment `{filter}`: {reason}")]
    DeploymentLookup { filter: String, reason: String },

    #[error("Error while reading deployments: {0}")]
    DeploymentsListing(String),

    #[error("Director error: {0}")]
    DirectorError(String),

    #[error("Invalid CIDR `{cidr}`: {reason}")]
    InvalidCidr { cidr: String, reason: String },

    #[error("Invalid process pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Error while marshalling TargetGroups: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to {step}: {source}")]
    SinkFailed {
        step: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("ConfigMap error: {0}")]
    ConfigMapError(String),

    #[error("Kubernetes error: {0}")]
    KubernetesError(String),

    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SdError {
    pub(crate) fn sink(step: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| SdError::SinkFailed { step, source }
    }
}

pub type Result<T> = std::result::Result<T, SdError>;
