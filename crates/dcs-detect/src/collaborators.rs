//! Collaborator traits: the seams between the pipeline and its
//! external scoring models and stream decoder.
//!
//! All three scoring models are opaque behind a single capability
//! each, so any inference backend can be substituted without touching
//! pipeline logic. Production backends live in [`crate::backends`];
//! tests use `mockall` doubles.

use async_trait::async_trait;
use ndarray::Array3;

use crate::error::DetectResult;
use crate::segment::{AudioBatch, FrameBatch, Segment};

/// Per-frame spatial feature map: frames x spatial positions x channels.
pub type FeatureTensor = Array3<f32>;

/// Single top sentiment label with confidence, as returned by the
/// sentiment collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentScore {
    /// `POSITIVE`, `NEGATIVE`, or `NEUTRAL`
    pub label: String,
    /// Confidence in [0, 1]
    pub score: f64,
}

/// Visual feature extraction over a decoded frame batch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeatureExtractor: Send + Sync {
    /// Extract a feature tensor (frames x spatial x channels).
    async fn extract(&self, frames: &FrameBatch) -> DetectResult<FeatureTensor>;
}

/// Sentiment classification over an audio window.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify the window, returning the single top label.
    async fn classify(&self, audio: &AudioBatch) -> DetectResult<SentimentScore>;
}

/// Viral probability prediction over a combined feature vector.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ViralPredictor: Send + Sync {
    /// Predict viral probability in [0, 1].
    async fn predict(&self, features: &[f64]) -> DetectResult<f64>;
}

/// A decoded stream: metadata plus a segment reader.
pub struct DecodedStream {
    /// Total stream length in seconds
    pub duration_secs: f64,
    /// Reader yielding segments in timestamp order
    pub reader: Box<dyn SegmentReader>,
}

impl std::fmt::Debug for DecodedStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedStream")
            .field("duration_secs", &self.duration_secs)
            .finish_non_exhaustive()
    }
}

/// Ordered segment iteration over a decoded stream.
#[async_trait]
pub trait SegmentReader: Send {
    /// Next segment in timestamp order, or `None` at end of stream.
    async fn next_segment(&mut self) -> DetectResult<Option<Segment>>;
}

/// Opens a source path/URL as a decodable stream.
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Open the source, failing with a decode error if unreadable.
    async fn open(&self, source: &str) -> DetectResult<DecodedStream>;
}
