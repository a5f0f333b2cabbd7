//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Planning (files per action)
//! - Transcode worker pool (durations, failures)
//! - Copy stage (bytes written)
//!
//! Registration and encoding are left to the binary.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Planning Metrics
// =============================================================================

/// Files seen by the planner, by decided action.
pub static FILES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("tracksync_files_total", "Total library files by action"),
        &["action"], // "copy", "transcode", "ignore", "skip"
    )
    .unwrap()
});

// =============================================================================
// Pipeline Metrics
// =============================================================================

/// Transcode duration in seconds.
pub static TRANSCODE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "tracksync_transcode_duration_seconds",
            "Duration of encoder runs",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Bytes written to the target.
pub static BYTES_COPIED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "tracksync_bytes_copied_total",
        "Total bytes written to the target",
    )
    .unwrap()
});

/// Runs that ended with a fatal pipeline error.
pub static PIPELINE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "tracksync_pipeline_failures_total",
        "Total fatal pipeline errors",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(FILES_TOTAL.clone()),
        Box::new(TRANSCODE_DURATION.clone()),
        Box::new(BYTES_COPIED.clone()),
        Box::new(PIPELINE_FAILURES.clone()),
    ]
}
