//! Service discovery scrape gauges
//!
//! Both gauges carry the director identity as constant labels, set once at
//! construction.

use crate::Result;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, Opts};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Constant labels identifying the BOSH director being scraped
#[derive(Debug, Clone, Default)]
pub struct DirectorLabels {
    pub environment: String,
    pub bosh_name: String,
    pub bosh_uuid: String,
}

#[derive(Clone)]
pub struct ScrapeMetrics {
    last_scrape_timestamp: Gauge,
    last_scrape_duration_seconds: Gauge,
}

impl ScrapeMetrics {
    pub fn new(namespace: &str, labels: &DirectorLabels) -> Result<Self> {
        let opts = |name: &str, help: &str| {
            Opts::new(name, help)
                .namespace(namespace)
                .const_label("environment", labels.environment.as_str())
                .const_label("bosh_name", labels.bosh_name.as_str())
                .const_label("bosh_uuid", labels.bosh_uuid.as_str())
        };

        Ok(Self {
            last_scrape_timestamp: Gauge::with_opts(opts(
                "last_service_discovery_scrape_timestamp",
                "Number of seconds since 1970 since last scrape of Service Discovery from BOSH.",
            ))?,
            last_scrape_duration_seconds: Gauge::with_opts(opts(
                "last_service_discovery_scrape_duration_seconds",
                "Duration of the last scrape of Service Discovery from BOSH.",
            ))?,
        })
    }

    /// Records completion now and the time elapsed since `begun`
    pub fn record(&self, begun: Instant) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        self.last_scrape_timestamp.set(now as f64);
        self.last_scrape_duration_seconds
            .set(begun.elapsed().as_secs_f64());
    }

    pub fn last_scrape_timestamp(&self) -> f64 {
        self.last_scrape_timestamp.get()
    }

    pub fn last_scrape_duration_seconds(&self) -> f64 {
        self.last_scrape_duration_seconds.get()
    }
}

impl Collector for ScrapeMetrics {
    fn desc(&self) -> Vec<&Desc> {
        self.last_scrape_timestamp
            .desc()
            .into_iter()
            .chain(self.last_scrape_duration_seconds.desc())
            .collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let mut families = self.last_scrape_timestamp.collect();
        families.extend(self.last_scrape_duration_seconds.collect());
        families
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> DirectorLabels {
        DirectorLabels {
            environment: "test_environment".to_string(),
            bosh_name: "test_bosh_name".to_string(),
            bosh_uuid: "test_bosh_uuid".to_string(),
        }
    }

    #[test]
    fn test_describes_both_gauges() {
        let metrics = ScrapeMetrics::new("test_exporter", &labels()).unwrap();

        let names: Vec<_> = metrics.desc().iter().map(|d| d.fq_name.clone()).collect();
        assert_eq!(
            names,
            vec![
                "test_exporter_last_service_discovery_scrape_timestamp",
                "test_exporter_last_service_discovery_scrape_duration_seconds",
            ]
        );
    }

    #[test]
    fn test_record_sets_gauges() {
        let metrics = ScrapeMetrics::new("test_exporter", &labels()).unwrap();
        assert_eq!(metrics.last_scrape_timestamp(), 0.0);

        metrics.record(Instant::now());

        assert!(metrics.last_scrape_timestamp() > 1_600_000_000.0);
        assert!(metrics.last_scrape_duration_seconds() >= 0.0);
        assert_eq!(metrics.collect().len(), 2);
    }
}
