//! Content type classification.
//!
//! Coarse heuristic over the segment's pooled visual features. The
//! activation statistics are squashed into [0, 1] and bucketed over
//! the fixed category list, so classification stays deterministic for
//! a given feature tensor.
//!
//! TODO: replace the bucketing heuristic with a dedicated classifier
//! head on the inference sidecar once one is trained.

use dcs_models::ContentType;

use crate::collaborators::FeatureTensor;
use crate::scorer::mean_pool_channels;

/// Classify a segment's content type from its visual features.
///
/// Falls back to [`ContentType::Unknown`] when no features are
/// available (extraction failed or the tensor is degenerate).
pub fn classify_content_type(features: Option<&FeatureTensor>) -> ContentType {
    let Some(tensor) = features else {
        return ContentType::Unknown;
    };

    let pooled = mean_pool_channels(tensor);
    if pooled.is_empty() {
        return ContentType::Unknown;
    }

    let mean = pooled.iter().sum::<f64>() / pooled.len() as f64;
    if !mean.is_finite() {
        return ContentType::Unknown;
    }

    // Sigmoid squash, then bucket over the category list.
    let squashed = 1.0 / (1.0 + (-mean).exp());
    let buckets = ContentType::CATEGORIES.len();
    let index = ((squashed * buckets as f64) as usize).min(buckets - 1);

    ContentType::CATEGORIES[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_missing_features_unknown() {
        assert_eq!(classify_content_type(None), ContentType::Unknown);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let tensor = Array3::from_shape_vec((2, 3, 4), (0..24).map(|v| v as f32 / 24.0).collect())
            .unwrap();
        let first = classify_content_type(Some(&tensor));
        let second = classify_content_type(Some(&tensor));
        assert_eq!(first, second);
        assert_ne!(first, ContentType::Unknown);
    }

    #[test]
    fn test_extreme_activations_map_to_edge_buckets() {
        let low = Array3::from_elem((1, 2, 2), -50.0f32);
        let high = Array3::from_elem((1, 2, 2), 50.0f32);

        assert_eq!(
            classify_content_type(Some(&low)),
            ContentType::CATEGORIES[0]
        );
        assert_eq!(
            classify_content_type(Some(&high)),
            *ContentType::CATEGORIES.last().unwrap()
        );
    }
}
