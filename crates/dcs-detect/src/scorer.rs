//! Segment scoring.
//!
//! Combines pooled visual features, the audio sentiment triple, and
//! the viral predictor's output into a [`ScoreSet`]. Scoring is
//! fail-soft: a collaborator failure degrades the segment to an
//! all-zero score set and is logged with enough context (batch index,
//! start offset) to reproduce it, but never surfaces to the caller.

use std::sync::Arc;

use ndarray::Axis;
use tracing::warn;

use dcs_models::{AudioSentiment, ScoreSet};

use crate::collaborators::{FeatureExtractor, FeatureTensor, SentimentClassifier, ViralPredictor};
use crate::error::DetectResult;
use crate::segment::Segment;

/// Scores segments against the three collaborator models.
pub struct SegmentScorer {
    features: Arc<dyn FeatureExtractor>,
    sentiment: Arc<dyn SentimentClassifier>,
    viral: Arc<dyn ViralPredictor>,
}

impl SegmentScorer {
    pub fn new(
        features: Arc<dyn FeatureExtractor>,
        sentiment: Arc<dyn SentimentClassifier>,
        viral: Arc<dyn ViralPredictor>,
    ) -> Self {
        Self {
            features,
            sentiment,
            viral,
        }
    }

    /// Score a segment. Never fails and never returns out-of-range
    /// values; total collaborator failure yields an all-zero set.
    pub async fn score(&self, segment: &Segment) -> ScoreSet {
        self.score_with_context(segment).await.0
    }

    /// Score a segment and return the audio sentiment alongside, plus
    /// the visual feature tensor when extraction succeeded (reused for
    /// content classification).
    pub async fn score_with_context(
        &self,
        segment: &Segment,
    ) -> (ScoreSet, AudioSentiment, Option<FeatureTensor>) {
        // Sentiment recovers independently: a failed classification
        // falls back to neutral without zeroing the visual scores.
        let sentiment = self.audio_sentiment(segment).await;

        match self.try_score(segment, &sentiment).await {
            Ok((scores, tensor)) => (scores, sentiment, Some(tensor)),
            Err(e) => {
                warn!(
                    batch = segment.index,
                    start_secs = segment.start_secs,
                    error = %e,
                    "Segment scoring failed, degrading to zero scores"
                );
                (ScoreSet::zeroed(), sentiment, None)
            }
        }
    }

    /// Classify the segment's audio window into a three-way sentiment
    /// distribution. Falls back to fully neutral on failure.
    pub async fn audio_sentiment(&self, segment: &Segment) -> AudioSentiment {
        match self.sentiment.classify(&segment.audio).await {
            Ok(top) => {
                let label = top.label.to_ascii_uppercase();
                AudioSentiment::new(
                    if label == "POSITIVE" { top.score } else { 0.0 },
                    if label == "NEGATIVE" { top.score } else { 0.0 },
                    if label == "NEUTRAL" { top.score } else { 0.0 },
                )
            }
            Err(e) => {
                warn!(
                    batch = segment.index,
                    start_secs = segment.start_secs,
                    error = %e,
                    "Audio sentiment failed, defaulting to neutral"
                );
                AudioSentiment::default()
            }
        }
    }

    async fn try_score(
        &self,
        segment: &Segment,
        sentiment: &AudioSentiment,
    ) -> DetectResult<(ScoreSet, FeatureTensor)> {
        let tensor = self.features.extract(&segment.frames).await?;

        // Mean-pool over frames and spatial positions, then append the
        // sentiment triple to form the viral predictor's input.
        let mut combined = mean_pool_channels(&tensor);
        combined.extend([sentiment.positive, sentiment.negative, sentiment.neutral]);

        let viral_probability = self.viral.predict(&combined).await?;

        let interest = mean_of_spatial_max(&tensor);
        let engagement = (viral_probability + interest) / 2.0;

        Ok((
            ScoreSet::new(interest, engagement, viral_probability),
            tensor,
        ))
    }
}

/// Per-channel mean over the frame and spatial axes.
pub(crate) fn mean_pool_channels(tensor: &FeatureTensor) -> Vec<f64> {
    let (frames, spatial, channels) = tensor.dim();
    if frames == 0 || spatial == 0 || channels == 0 {
        return Vec::new();
    }

    let count = (frames * spatial) as f64;
    (0..channels)
        .map(|c| {
            tensor
                .index_axis(Axis(2), c)
                .iter()
                .map(|v| *v as f64)
                .sum::<f64>()
                / count
        })
        .collect()
}

/// Mean of the per-frame, per-channel spatial maxima. This is the
/// interest score: how strongly the strongest activations respond.
pub(crate) fn mean_of_spatial_max(tensor: &FeatureTensor) -> f64 {
    let (frames, spatial, channels) = tensor.dim();
    if frames == 0 || spatial == 0 || channels == 0 {
        return 0.0;
    }

    let mut sum = 0.0f64;
    for f in 0..frames {
        for c in 0..channels {
            let max = (0..spatial)
                .map(|s| tensor[[f, s, c]])
                .fold(f32::NEG_INFINITY, f32::max);
            sum += max as f64;
        }
    }
    sum / (frames * channels) as f64
}
