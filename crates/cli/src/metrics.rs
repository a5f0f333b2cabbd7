//! Prometheus registry for the textfile export.
//!
//! The core keeps its own collectors; this module registers them next to the
//! run timestamp and renders the text exposition format.

use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntGauge, Registry, TextEncoder};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Unix time of the end of the last run.
pub static LAST_RUN_TIMESTAMP: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "tracksync_last_run_timestamp_seconds",
        "Unix timestamp of the last sync run",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(LAST_RUN_TIMESTAMP.clone()))
        .unwrap();

    for collector in tracksync_core::metrics::all_metrics() {
        registry.register(collector).unwrap();
    }
}

/// Encode all metrics in Prometheus text format.
pub fn encode_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics are not valid UTF-8")
}

/// Stamps the run time and writes every metric to `path`.
pub fn write_textfile(path: &Path) -> Result<()> {
    LAST_RUN_TIMESTAMP.set(chrono::Utc::now().timestamp());
    let text = encode_metrics()?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write metrics to {:?}", path))
}
