//! Prometheus metrics for the run report.
//!
//! The core counters are registered in a process registry and dumped in the
//! text exposition format at the end of a run.

use once_cell::sync::Lazy;
use prometheus::{self, Encoder, IntGauge, Registry, TextEncoder};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Notices requested in the current run.
pub static NOTICES_REQUESTED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "form22_notices_requested",
        "Number of notices requested in this run",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(NOTICES_REQUESTED.clone()))
        .unwrap();

    for metric in form22_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics in Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return format!("# failed to encode metrics: {}\n", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}
