use crate::Result;
use prometheus::{Encoder, Registry, TextEncoder};

/// Renders a registry in the Prometheus text exposition format
pub struct PrometheusExporter {
    registry: Registry,
}

impl PrometheusExporter {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn format_metrics(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;

        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
