//! Viral moment detection pipeline.
//!
//! The pipeline slides a fixed-size batch window over a decoded
//! video/audio stream, scores each window for interest, engagement
//! and viral probability, turns qualifying windows into candidate
//! moments with planned clip durations, and reduces the candidate set
//! to a non-overlapping ranking.
//!
//! Scoring models are opaque collaborators behind the traits in
//! [`collaborators`]; the default backends call the Python inference
//! sidecar through `dcs-ml-client`.

pub mod backends;
pub mod classify;
pub mod collaborators;
pub mod decode;
pub mod detector;
pub mod duration;
pub mod engagement;
pub mod error;
pub mod overlap;
pub mod platforms;
pub mod scorer;
pub mod segment;

pub use collaborators::{
    FeatureExtractor, FeatureTensor, SegmentReader, SentimentClassifier, SentimentScore,
    StreamSource, ViralPredictor,
};
pub use decode::{DecodeOptions, FfmpegStreamSource, StreamMeta};
pub use detector::{DetectorOptions, MomentDetector};
pub use duration::DurationPlanner;
pub use engagement::EngagementEstimator;
pub use error::{DetectError, DetectResult};
pub use overlap::OverlapResolver;
pub use platforms::recommend_platforms;
pub use scorer::SegmentScorer;
pub use segment::{AudioBatch, FrameBatch, Segment};
