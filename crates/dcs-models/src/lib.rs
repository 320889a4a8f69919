//! Shared data models for the DCS-Clipper detection pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Detected moments and their score sets
//! - Audio sentiment distributions
//! - Content types and distribution platforms
//! - Detection thresholds and duration bounds
//! - Engagement estimates for reporting

pub mod config;
pub mod content_type;
pub mod engagement;
pub mod moment;
pub mod platform;
pub mod scores;

// Re-export common types
pub use config::{ConfigError, DetectionConfig};
pub use content_type::ContentType;
pub use engagement::EngagementEstimate;
pub use moment::{Moment, MomentMetadata};
pub use platform::Platform;
pub use scores::{AudioSentiment, ScoreSet};
