//! # Metrics
//!
//! Prometheus export for the analysis pipeline.
//!
//! ## Metrics Tracked
//!
//! **Counters:**
//! - `nordicsense_requests_total{feature, status}` - HTTP analysis requests
//! - `nordicsense_cache_hits_total` / `nordicsense_cache_misses_total` - Full-analysis cache
//! - `nordicsense_short_text_total` - Requests answered without the provider
//! - `nordicsense_provider_errors_total{operation}` - Failed provider calls
//! - `nordicsense_batch_item_errors_total` - Batch items turned into error records
//!
//! **Histograms:**
//! - `nordicsense_fanout_duration_seconds` - Wall-clock time of the six-way fan-out

pub mod handler;

pub use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the global Prometheus recorder with custom histogram buckets.
///
/// Buckets are sized for LLM round trips: [0.1, 0.25, 0.5, 1, 2.5, 5, 10, 30, 60, 120] seconds.
///
/// Fails if a recorder is already installed.
pub fn setup_metrics() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::Matcher;

    let duration_buckets = &[0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("nordicsense_fanout_duration_seconds".to_string()),
            duration_buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Install the global recorder, or build a detached handle when one already exists.
pub fn metrics_handle() -> PrometheusHandle {
    setup_metrics().unwrap_or_else(|e| {
        tracing::debug!("Metrics already initialized, creating new handle: {}", e);
        PrometheusBuilder::new().build_recorder().handle()
    })
}
