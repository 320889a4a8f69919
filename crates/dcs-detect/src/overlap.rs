//! Overlap resolution: reducing candidates to a non-overlapping set.
//!
//! Candidates are stable-sorted by viral probability descending, then
//! greedily kept if they overlap none of the already-kept moments.
//!
//! This is a greedy interval-scheduling variant that maximizes kept
//! *viral probability mass*, not kept *count*. Classic interval
//! scheduling sorts by end time and maximizes the number of kept
//! intervals; sorting by priority instead may discard more short
//! non-overlapping candidates in exchange for keeping the strongest
//! ones. That trade-off is intentional policy, not a bug.

use std::cmp::Ordering;

use dcs_models::Moment;

/// Selects a maximal pairwise-non-overlapping subset of candidate
/// moments, ranked by viral probability.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapResolver;

impl OverlapResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve overlaps. Moments are filtered, never mutated; ties in
    /// viral probability keep their original relative order (stable
    /// sort). Running the resolver on its own output is a no-op.
    pub fn resolve(&self, moments: &[Moment]) -> Vec<Moment> {
        let mut ranked: Vec<&Moment> = moments.iter().collect();
        // Vec::sort_by is stable; NaN scores sort as equal rather than
        // poisoning the ordering.
        ranked.sort_by(|a, b| {
            b.scores
                .viral_probability
                .partial_cmp(&a.scores.viral_probability)
                .unwrap_or(Ordering::Equal)
        });

        let mut kept: Vec<Moment> = Vec::new();
        for candidate in ranked {
            if kept.iter().all(|m| !m.overlaps(candidate)) {
                kept.push(candidate.clone());
            }
        }

        kept
    }
}
