//! Prometheus metrics for the worker.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    pub const STREAMS_PROCESSED_TOTAL: &str = "dcs_streams_processed_total";
    pub const STREAMS_FAILED_TOTAL: &str = "dcs_streams_failed_total";
    pub const MOMENTS_DETECTED_TOTAL: &str = "dcs_moments_detected_total";
    pub const DETECTION_DURATION_SECONDS: &str = "dcs_detection_duration_seconds";
    pub const REPORTS_WRITTEN_TOTAL: &str = "dcs_reports_written_total";
}

/// Record a completed stream run.
pub fn record_stream_processed(moment_count: usize) {
    counter!(names::STREAMS_PROCESSED_TOTAL).increment(1);
    counter!(names::MOMENTS_DETECTED_TOTAL).increment(moment_count as u64);
}

/// Record a failed stream run.
pub fn record_stream_failed(stage: &str) {
    let labels = [("stage", stage.to_string())];
    counter!(names::STREAMS_FAILED_TOTAL, &labels).increment(1);
}

/// Record detection wall time for one stream.
pub fn record_detection_duration(duration_secs: f64) {
    histogram!(names::DETECTION_DURATION_SECONDS).record(duration_secs);
}

/// Record a written report.
pub fn record_report_written() {
    counter!(names::REPORTS_WRITTEN_TOTAL).increment(1);
}
