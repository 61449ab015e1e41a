//! Prometheus metrics for usher-server.
//!
//! Exposes server metrics in Prometheus format at the `/metrics` endpoint.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

use crate::sweep::SweepReport;

/// Initialize the Prometheus metrics recorder and return a handle for rendering.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Describe metrics for better documentation in /metrics output
    describe_counter!(
        "usher_requests_total",
        "Total number of invitation requests processed"
    );
    describe_histogram!(
        "usher_request_duration_seconds",
        "Duration of invitation requests in seconds"
    );
    describe_counter!("usher_sweep_runs_total", "Total number of expiry sweep runs");
    describe_counter!(
        "usher_sweep_transitions_total",
        "Total number of invitations transitioned to expired by the sweep"
    );
    describe_histogram!(
        "usher_sweep_duration_seconds",
        "Duration of expiry sweep runs in seconds"
    );

    handle
}

/// Record one dispatched request.
pub fn record_request(method: &str, status_code: u16, duration: Duration) {
    counter!(
        "usher_requests_total",
        "method" => method.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);
    histogram!("usher_request_duration_seconds", "method" => method.to_string())
        .record(duration.as_secs_f64());
}

/// Record one completed sweep run.
pub fn record_sweep(report: &SweepReport, duration: Duration) {
    counter!("usher_sweep_runs_total").increment(1);
    counter!("usher_sweep_transitions_total").increment(report.transitioned as u64);
    histogram!("usher_sweep_duration_seconds").record(duration.as_secs_f64());
}
