//! Optimal clip duration planning.

use dcs_models::DetectionConfig;

/// Maps interest and viral scores to a clamped optimal clip duration.
///
/// Pure and deterministic: higher scores stretch the clip toward the
/// configured maximum, lower scores shrink it toward the minimum.
#[derive(Debug, Clone, Copy)]
pub struct DurationPlanner {
    min_clip_duration: f64,
    max_clip_duration: f64,
}

impl DurationPlanner {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            min_clip_duration: config.min_clip_duration,
            max_clip_duration: config.max_clip_duration,
        }
    }

    /// Plan a clip duration in seconds.
    ///
    /// `duration_factor = (interest + viral) / 2`; the result is
    /// linearly interpolated between the configured bounds and
    /// clamped to `[min_clip_duration, max_clip_duration]`.
    pub fn plan(&self, interest: f64, viral: f64) -> f64 {
        let duration_factor = (interest + viral) / 2.0;
        let optimal = self.min_clip_duration
            + (self.max_clip_duration - self.min_clip_duration) * duration_factor;

        optimal.clamp(self.min_clip_duration, self.max_clip_duration)
    }
}
