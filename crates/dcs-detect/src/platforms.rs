//! Platform recommendation rules.

use std::collections::BTreeSet;

use dcs_models::{Platform, ScoreSet};

/// Map a moment's duration and scores to suggested distribution
/// channels. Each rule is evaluated independently, so a moment may
/// satisfy several; if none fires, YouTube is the default.
///
/// | condition                              | platforms          |
/// |----------------------------------------|--------------------|
/// | duration > 30 and interest > 0.7       | youtube            |
/// | duration < 60 and viral > 0.8          | tiktok, instagram  |
/// | duration < 45 and engagement > 0.75    | twitter            |
pub fn recommend_platforms(duration: f64, scores: &ScoreSet) -> BTreeSet<Platform> {
    let mut platforms = BTreeSet::new();

    // YouTube favors longer, high-interest content
    if duration > 30.0 && scores.interest > 0.7 {
        platforms.insert(Platform::Youtube);
    }

    // TikTok/Instagram favor short, highly viral clips
    if duration < 60.0 && scores.viral_probability > 0.8 {
        platforms.insert(Platform::Tiktok);
        platforms.insert(Platform::Instagram);
    }

    // Twitter favors short, high-engagement moments
    if duration < 45.0 && scores.engagement > 0.75 {
        platforms.insert(Platform::Twitter);
    }

    if platforms.is_empty() {
        platforms.insert(Platform::Youtube);
    }

    platforms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(interest: f64, engagement: f64, viral: f64) -> ScoreSet {
        ScoreSet::new(interest, engagement, viral)
    }

    #[test]
    fn test_no_rule_fires_defaults_to_youtube() {
        // duration 20 fails youtube's >30; viral 0.5 fails tiktok's
        // >0.8; engagement 0.5 fails twitter's >0.75
        let platforms = recommend_platforms(20.0, &scores(0.8, 0.5, 0.5));
        assert_eq!(platforms, BTreeSet::from([Platform::Youtube]));
    }

    #[test]
    fn test_long_interesting_moment_youtube() {
        let platforms = recommend_platforms(40.0, &scores(0.75, 0.5, 0.5));
        assert_eq!(platforms, BTreeSet::from([Platform::Youtube]));
    }

    #[test]
    fn test_short_viral_moment_tiktok_instagram() {
        let platforms = recommend_platforms(20.0, &scores(0.3, 0.5, 0.85));
        assert_eq!(
            platforms,
            BTreeSet::from([Platform::Tiktok, Platform::Instagram])
        );
    }

    #[test]
    fn test_short_engaging_moment_twitter() {
        let platforms = recommend_platforms(30.0, &scores(0.3, 0.8, 0.5));
        assert_eq!(platforms, BTreeSet::from([Platform::Twitter]));
    }

    #[test]
    fn test_rules_accumulate() {
        // duration 40: youtube (interest 0.8) + twitter (engagement
        // 0.8) + tiktok/instagram (viral 0.9, duration < 60)
        let platforms = recommend_platforms(40.0, &scores(0.8, 0.8, 0.9));
        assert_eq!(
            platforms,
            BTreeSet::from([
                Platform::Youtube,
                Platform::Tiktok,
                Platform::Instagram,
                Platform::Twitter
            ])
        );
    }

    #[test]
    fn test_rule_boundaries_are_strict() {
        // exactly at each boundary, no rule fires
        let platforms = recommend_platforms(30.0, &scores(0.7, 0.75, 0.8));
        assert_eq!(platforms, BTreeSet::from([Platform::Youtube]));
    }
}
