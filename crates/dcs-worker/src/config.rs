//! Worker configuration.

use std::time::Duration;

use dcs_models::DetectionConfig;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum streams detected in parallel
    pub max_concurrent_streams: usize,
    /// Work directory for temporary files
    pub work_dir: String,
    /// Directory detection reports are written to
    pub report_dir: String,
    /// Frames per scoring window
    pub batch_size: u32,
    /// Graceful shutdown timeout
    pub shutdown_timeout: Duration,
    /// Baseline view count for engagement projections
    pub base_views: f64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_streams: 2,
            work_dir: "/tmp/dcs".to_string(),
            report_dir: "/tmp/dcs/reports".to_string(),
            batch_size: 32,
            shutdown_timeout: Duration::from_secs(30),
            base_views: 1000.0,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_concurrent_streams: std::env::var("DCS_MAX_STREAMS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            work_dir: std::env::var("DCS_WORK_DIR").unwrap_or_else(|_| "/tmp/dcs".to_string()),
            report_dir: std::env::var("DCS_REPORT_DIR")
                .unwrap_or_else(|_| "/tmp/dcs/reports".to_string()),
            batch_size: std::env::var("DCS_BATCH_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(32),
            shutdown_timeout: Duration::from_secs(
                std::env::var("DCS_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            base_views: std::env::var("DCS_BASE_VIEWS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000.0),
        }
    }
}

/// Detection thresholds from environment variables, falling back to
/// the model defaults. Validation happens at detector construction.
pub fn detection_config_from_env() -> DetectionConfig {
    let defaults = DetectionConfig::default();

    fn var_f64(name: &str, default: f64) -> f64 {
        std::env::var(name)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(default)
    }

    DetectionConfig {
        interest_threshold: var_f64("DCS_INTEREST_THRESHOLD", defaults.interest_threshold),
        engagement_threshold: var_f64("DCS_ENGAGEMENT_THRESHOLD", defaults.engagement_threshold),
        viral_threshold: var_f64("DCS_VIRAL_THRESHOLD", defaults.viral_threshold),
        min_clip_duration: var_f64("DCS_MIN_CLIP_DURATION", defaults.min_clip_duration),
        max_clip_duration: var_f64("DCS_MAX_CLIP_DURATION", defaults.max_clip_duration),
        fps: var_f64("DCS_FPS", defaults.fps),
    }
}
