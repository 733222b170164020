//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Resolver (bootstrap results, lookup outcomes)
//! - Assembler (archives written, assembly duration)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Resolver Metrics
// =============================================================================

/// Session bootstraps by result.
pub static BOOTSTRAP_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("form22_bootstrap_total", "Tracking session bootstraps"),
        &["result"], // "ready", "failed", "interrupted"
    )
    .unwrap()
});

/// Tracking lookups by resolution status.
pub static FETCH_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("form22_fetch_total", "Tracking lookups by outcome"),
        &["status"],
    )
    .unwrap()
});

// =============================================================================
// Assembler Metrics
// =============================================================================

/// Notice archives by result.
pub static ARCHIVES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("form22_archives_total", "Notice archives assembled"),
        &["result"], // "written", "failed"
    )
    .unwrap()
});

/// Time spent writing one archive.
pub static ARCHIVE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "form22_archive_duration_seconds",
            "Duration of archive assembly",
        )
        .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(BOOTSTRAP_TOTAL.clone()),
        Box::new(FETCH_TOTAL.clone()),
        Box::new(ARCHIVES_TOTAL.clone()),
        Box::new(ARCHIVE_DURATION.clone()),
    ]
}
