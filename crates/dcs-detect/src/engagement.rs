//! Downstream engagement estimation.
//!
//! Derives a blended engagement score and projected view/share/
//! retention numbers from a moment's scores. Used for reporting only;
//! selection never depends on these estimates.

use dcs_models::{EngagementEstimate, Moment};

use crate::platforms::recommend_platforms;

/// Blend weights. Tunable policy constants, not hard physics: viral
/// probability dominates, with interest and positive audio sentiment
/// contributing equally.
const VIRAL_WEIGHT: f64 = 0.4;
const INTEREST_WEIGHT: f64 = 0.3;
const POSITIVE_SENTIMENT_WEIGHT: f64 = 0.3;

/// Exponent multiplier of the exponential view growth model.
const VIEW_GROWTH_RATE: f64 = 2.0;

/// Derives engagement estimates from detected moments.
#[derive(Debug, Clone, Copy)]
pub struct EngagementEstimator {
    /// Baseline view count an engagement score of zero projects to.
    base_views: f64,
}

impl Default for EngagementEstimator {
    fn default() -> Self {
        Self { base_views: 1000.0 }
    }
}

impl EngagementEstimator {
    pub fn new(base_views: f64) -> Self {
        Self {
            base_views: base_views.max(0.0),
        }
    }

    /// Estimate downstream engagement for a moment.
    ///
    /// Pure function; a zeroed score set (total collaborator failure)
    /// yields a zero engagement score and `base_views` views.
    pub fn estimate(&self, moment: &Moment) -> EngagementEstimate {
        let scores = &moment.scores;
        let positive = zero_if_invalid(moment.metadata.audio_sentiment.positive);

        let engagement_score = VIRAL_WEIGHT * zero_if_invalid(scores.viral_probability)
            + INTEREST_WEIGHT * zero_if_invalid(scores.interest)
            + POSITIVE_SENTIMENT_WEIGHT * positive;

        EngagementEstimate {
            engagement_score,
            estimated_views: (self.base_views * (VIEW_GROWTH_RATE * engagement_score).exp())
                as u64,
            share_probability: (1.2 * engagement_score).min(1.0),
            retention_score: 0.9 * engagement_score,
            platform_suitability: recommend_platforms(moment.duration, scores),
        }
    }
}

/// Invalid or missing inputs default to 0.0 rather than raising.
fn zero_if_invalid(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcs_models::{AudioSentiment, MomentMetadata, ScoreSet};

    fn moment(interest: f64, viral: f64, positive: f64) -> Moment {
        Moment::new(
            10.0,
            20.0,
            ScoreSet::new(interest, (viral + interest) / 2.0, viral),
            MomentMetadata {
                audio_sentiment: AudioSentiment::new(positive, 0.0, 0.0),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_weighted_blend() {
        let estimate = EngagementEstimator::default().estimate(&moment(0.5, 0.8, 1.0));
        // 0.4*0.8 + 0.3*0.5 + 0.3*1.0 = 0.77
        assert!((estimate.engagement_score - 0.77).abs() < 1e-9);
    }

    #[test]
    fn test_zeroed_scores_yield_base_views() {
        let estimator = EngagementEstimator::new(1000.0);
        let m = Moment::new(
            0.0,
            10.0,
            ScoreSet::zeroed(),
            MomentMetadata::default(),
        );
        let estimate = estimator.estimate(&m);

        assert_eq!(estimate.engagement_score, 0.0);
        assert_eq!(estimate.estimated_views, 1000);
        assert_eq!(estimate.share_probability, 0.0);
        assert_eq!(estimate.retention_score, 0.0);
    }

    #[test]
    fn test_views_grow_exponentially() {
        let estimator = EngagementEstimator::new(1000.0);
        let low = estimator.estimate(&moment(0.2, 0.2, 0.2));
        let high = estimator.estimate(&moment(0.9, 0.9, 0.9));

        assert!(high.estimated_views > low.estimated_views);
        // engagement 0.9 -> 1000 * e^1.8
        assert_eq!(high.estimated_views, (1000.0 * (1.8f64).exp()) as u64);
    }

    #[test]
    fn test_share_probability_capped() {
        let estimate = EngagementEstimator::default().estimate(&moment(1.0, 1.0, 1.0));
        assert_eq!(estimate.share_probability, 1.0);
    }

    #[test]
    fn test_retention_is_fraction_of_engagement() {
        let estimate = EngagementEstimator::default().estimate(&moment(0.5, 0.5, 0.5));
        assert!((estimate.retention_score - 0.9 * estimate.engagement_score).abs() < 1e-9);
    }
}
