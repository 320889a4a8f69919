//! Score sets and audio sentiment distributions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The three scalar scores produced for a scored segment.
///
/// Produced once per segment and immutable afterwards. All fields are
/// clamped to `[0, 1]` at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreSet {
    /// Visual interest score
    pub interest: f64,

    /// Engagement potential (blend of viral probability and interest)
    pub engagement: f64,

    /// Model-derived probability of high organic reach
    pub viral_probability: f64,
}

impl ScoreSet {
    /// Create a score set, clamping every component to `[0, 1]`.
    pub fn new(interest: f64, engagement: f64, viral_probability: f64) -> Self {
        Self {
            interest: clamp_unit(interest),
            engagement: clamp_unit(engagement),
            viral_probability: clamp_unit(viral_probability),
        }
    }

    /// All-zero score set, used when scoring fails entirely.
    pub fn zeroed() -> Self {
        Self {
            interest: 0.0,
            engagement: 0.0,
            viral_probability: 0.0,
        }
    }

    /// Whether every component is zero (total collaborator failure).
    pub fn is_zeroed(&self) -> bool {
        self.interest == 0.0 && self.engagement == 0.0 && self.viral_probability == 0.0
    }
}

/// Three-way sentiment distribution for an audio window.
///
/// Each component is in `[0, 1]`; the components are independent
/// confidences, not a normalized distribution, so they need not sum
/// to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AudioSentiment {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl AudioSentiment {
    /// Create a sentiment distribution, clamping components to `[0, 1]`.
    pub fn new(positive: f64, negative: f64, neutral: f64) -> Self {
        Self {
            positive: clamp_unit(positive),
            negative: clamp_unit(negative),
            neutral: clamp_unit(neutral),
        }
    }
}

impl Default for AudioSentiment {
    /// Fully-neutral fallback used when sentiment classification fails.
    fn default() -> Self {
        Self {
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
        }
    }
}

/// Clamp a score into `[0, 1]`, mapping NaN to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_set_clamps_out_of_range() {
        let scores = ScoreSet::new(1.5, -0.2, 0.9);
        assert_eq!(scores.interest, 1.0);
        assert_eq!(scores.engagement, 0.0);
        assert_eq!(scores.viral_probability, 0.9);
    }

    #[test]
    fn test_score_set_clamps_nan() {
        let scores = ScoreSet::new(f64::NAN, 0.5, f64::NAN);
        assert_eq!(scores.interest, 0.0);
        assert_eq!(scores.viral_probability, 0.0);
    }

    #[test]
    fn test_zeroed_score_set() {
        let scores = ScoreSet::zeroed();
        assert!(scores.is_zeroed());
        assert!(!ScoreSet::new(0.1, 0.0, 0.0).is_zeroed());
    }

    #[test]
    fn test_default_sentiment_is_neutral() {
        let sentiment = AudioSentiment::default();
        assert_eq!(sentiment.positive, 0.0);
        assert_eq!(sentiment.negative, 0.0);
        assert_eq!(sentiment.neutral, 1.0);
    }
}
