//! Per-stream processing: detect, resolve, enrich, report.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use tracing::{info, warn};

use dcs_detect::decode::{DecodeOptions, FfmpegStreamSource};
use dcs_detect::{
    DetectorOptions, EngagementEstimator, MomentDetector, SegmentScorer, StreamSource,
};
use dcs_ml_client::MlClient;
use dcs_models::DetectionConfig;

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::metrics;
use crate::report::DetectionReport;

/// Shared state for stream processing.
///
/// Built once per worker; each stream run borrows it immutably, so
/// runs never share mutable state.
pub struct ProcessingContext {
    pub config: WorkerConfig,
    pub detector: MomentDetector,
    pub estimator: EngagementEstimator,
    pub source: Arc<dyn StreamSource>,
}

impl ProcessingContext {
    /// Production wiring: ML sidecar backends and ffmpeg decoding.
    pub fn new(config: WorkerConfig, detection: DetectionConfig) -> WorkerResult<Self> {
        let ml = Arc::new(MlClient::from_env()?);
        let scorer = SegmentScorer::new(ml.clone(), ml.clone(), ml);

        let options = DetectorOptions {
            batch_size: config.batch_size,
        };
        let decode = DecodeOptions {
            fps: detection.fps,
            batch_size: config.batch_size,
            ..Default::default()
        };

        let detector = MomentDetector::new(detection, scorer, options)?;
        let estimator = EngagementEstimator::new(config.base_views);
        let source = Arc::new(FfmpegStreamSource::new(decode));

        Ok(Self {
            config,
            detector,
            estimator,
            source,
        })
    }
}

/// Run detection over one stream and write its report.
///
/// Detection itself is fail-soft: an undecodable stream yields an
/// empty report. Only report IO surfaces as an error.
pub async fn process_stream(
    ctx: &ProcessingContext,
    source_path: &str,
    cancel: Option<watch::Receiver<bool>>,
) -> WorkerResult<DetectionReport> {
    let started = Instant::now();

    let moments = ctx
        .detector
        .detect_and_resolve(ctx.source.as_ref(), source_path, cancel)
        .await;
    metrics::record_detection_duration(started.elapsed().as_secs_f64());

    if moments.is_empty() {
        warn!(source = source_path, "No moments detected");
    }

    let enriched: Vec<_> = moments
        .into_iter()
        .map(|m| {
            let estimate = ctx.estimator.estimate(&m);
            (m, estimate)
        })
        .collect();

    let report = DetectionReport::new(source_path, enriched);
    let path = report.write_to_dir(&ctx.config.report_dir).await?;

    metrics::record_stream_processed(report.moment_count);
    metrics::record_report_written();
    info!(
        source = source_path,
        run_id = %report.run_id,
        moments = report.moment_count,
        report = %path.display(),
        elapsed_secs = started.elapsed().as_secs_f64(),
        "Stream processed"
    );

    Ok(report)
}
