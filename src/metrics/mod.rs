pub mod exporter;
pub mod scrape;

pub use exporter::PrometheusExporter;
pub use scrape::{DirectorLabels, ScrapeMetrics};
