//! Prometheus recorder for pipeline counters.
//!
//! Counters are emitted with the `metrics` macros wherever the work happens;
//! this module only installs the recorder and keeps the handle so the server
//! can render it on `/metrics`.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing::{info, warn};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global recorder. Idempotent.
pub fn init_metrics() {
    if HANDLE.get().is_some() {
        return;
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if HANDLE.set(handle).is_ok() {
                register_metrics();
                info!("Prometheus recorder installed");
            }
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
        }
    }
}

/// Render current metrics in the Prometheus text format, if installed
pub fn render() -> Option<String> {
    HANDLE.get().map(PrometheusHandle::render)
}

fn register_metrics() {
    ::metrics::describe_counter!(
        "propper_records_ingested_total",
        "Records produced by the ingestion normalizer"
    );
    ::metrics::describe_counter!(
        "propper_missing_columns_total",
        "Schema columns absent from uploaded files"
    );
    ::metrics::describe_counter!(
        "propper_records_deduplicated_total",
        "Records surviving deduplication"
    );
    ::metrics::describe_counter!(
        "propper_duplicates_removed_total",
        "Records discarded as older duplicates"
    );
    ::metrics::describe_counter!("propper_good_deals_total", "Listings flagged as good deals");
    ::metrics::describe_counter!("propper_stress_sales_total", "Listings with stress keywords");
    ::metrics::describe_histogram!(
        "propper_pipeline_duration_seconds",
        "Wall time of one calculate request"
    );
}
