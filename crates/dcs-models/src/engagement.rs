//! Downstream engagement estimates.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Projected downstream performance for a detected moment.
///
/// Derived for reporting only; selection never depends on these
/// numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EngagementEstimate {
    /// Blended engagement score in [0, 1]
    pub engagement_score: f64,

    /// Projected view count under the exponential growth model
    pub estimated_views: u64,

    /// Probability a viewer shares the clip, capped at 1.0
    pub share_probability: f64,

    /// Projected audience retention in [0, 1]
    pub retention_score: f64,

    /// Platforms the moment is suited for
    pub platform_suitability: BTreeSet<Platform>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_roundtrip() {
        let estimate = EngagementEstimate {
            engagement_score: 0.62,
            estimated_views: 3455,
            share_probability: 0.744,
            retention_score: 0.558,
            platform_suitability: BTreeSet::from([Platform::Youtube, Platform::Twitter]),
        };
        let json = serde_json::to_string(&estimate).unwrap();
        let parsed: EngagementEstimate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, estimate);
    }
}
