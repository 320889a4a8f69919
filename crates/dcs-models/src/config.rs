//! Detection thresholds and clip duration bounds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when validating a [`DetectionConfig`].
///
/// Configuration errors are fatal at construction time: a pipeline is
/// never built from an invalid config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("threshold {name} must be in [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("{name} must be positive and finite, got {value}")]
    InvalidDuration { name: &'static str, value: f64 },

    #[error("min_clip_duration {min} exceeds max_clip_duration {max}")]
    InvertedDurationBounds { min: f64, max: f64 },

    #[error("fps must be positive and finite, got {0}")]
    InvalidFps(f64),
}

/// Process-wide detection thresholds, loaded once at pipeline
/// construction and immutable for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectionConfig {
    /// Minimum interest score for a segment to qualify (strict >)
    pub interest_threshold: f64,

    /// Minimum engagement potential, used for reporting filters
    pub engagement_threshold: f64,

    /// Minimum viral probability for a segment to qualify (strict >)
    pub viral_threshold: f64,

    /// Shortest clip duration that will be planned (seconds)
    pub min_clip_duration: f64,

    /// Longest clip duration that will be planned (seconds)
    pub max_clip_duration: f64,

    /// Frame rate the decoded stream is sampled at
    pub fps: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            interest_threshold: 0.7,
            engagement_threshold: 0.65,
            viral_threshold: 0.8,
            min_clip_duration: 5.0,
            max_clip_duration: 60.0,
            fps: 30.0,
        }
    }
}

impl DetectionConfig {
    /// Validate threshold ranges and duration bounds.
    ///
    /// Must be called before any detection run starts; an invalid
    /// config is rejected rather than silently clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("interest_threshold", self.interest_threshold),
            ("engagement_threshold", self.engagement_threshold),
            ("viral_threshold", self.viral_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }

        for (name, value) in [
            ("min_clip_duration", self.min_clip_duration),
            ("max_clip_duration", self.max_clip_duration),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDuration { name, value });
            }
        }

        if self.min_clip_duration > self.max_clip_duration {
            return Err(ConfigError::InvertedDurationBounds {
                min: self.min_clip_duration,
                max: self.max_clip_duration,
            });
        }

        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(ConfigError::InvalidFps(self.fps));
        }

        Ok(())
    }
}
