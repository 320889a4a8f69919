//! Detected moment models.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::content_type::ContentType;
use crate::platform::Platform;
use crate::scores::{AudioSentiment, ScoreSet};

/// A candidate (or final) viral moment within a source stream.
///
/// Moments are created by the detector, enriched with metadata, and
/// filtered by overlap resolution. They are value objects: never
/// mutated after creation, never persisted beyond a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Moment {
    /// Seconds from stream start (>= 0)
    pub timestamp: f64,

    /// Planned clip duration in seconds, within the configured bounds
    pub duration: f64,

    /// The segment's score set
    pub scores: ScoreSet,

    /// Enrichment metadata attached at detection time
    pub metadata: MomentMetadata,
}

/// Metadata attached to a detected moment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct MomentMetadata {
    /// Sentiment distribution of the moment's audio window
    pub audio_sentiment: AudioSentiment,

    /// Coarse content category
    pub content_type: ContentType,

    /// Platforms the moment is suited for
    pub recommended_platforms: BTreeSet<Platform>,
}

impl Moment {
    /// Create a new moment.
    pub fn new(timestamp: f64, duration: f64, scores: ScoreSet, metadata: MomentMetadata) -> Self {
        Self {
            timestamp: timestamp.max(0.0),
            duration: duration.max(0.0),
            scores,
            metadata,
        }
    }

    /// End offset of the moment in seconds from stream start.
    pub fn end(&self) -> f64 {
        self.timestamp + self.duration
    }

    /// Interval overlap test: `NOT (end_a <= start_b OR start_a >= end_b)`.
    ///
    /// Touching endpoints do not count as overlap, so back-to-back
    /// clips are allowed.
    pub fn overlaps(&self, other: &Moment) -> bool {
        !(self.end() <= other.timestamp || self.timestamp >= other.end())
    }
}
