//! Production collaborator backends.
//!
//! Bridges the inference sidecar client to the scoring traits. Each
//! impl maps transport failures to [`DetectError::Collaborator`] so
//! the scorer can recover locally.

use async_trait::async_trait;
use ndarray::Array3;

use dcs_ml_client::MlClient;

use crate::collaborators::{
    FeatureExtractor, FeatureTensor, SentimentClassifier, SentimentScore, ViralPredictor,
};
use crate::error::{DetectError, DetectResult};
use crate::segment::{AudioBatch, FrameBatch};

#[async_trait]
impl FeatureExtractor for MlClient {
    async fn extract(&self, frames: &FrameBatch) -> DetectResult<FeatureTensor> {
        let response = self
            .extract_features(frames.width, frames.height, frames.frame_count, &frames.pixels)
            .await
            .map_err(|e| DetectError::collaborator("features", e.to_string()))?;

        let [f, s, c] = response.shape;
        Array3::from_shape_vec((f, s, c), response.data)
            .map_err(|e| DetectError::collaborator("features", e.to_string()))
    }
}

#[async_trait]
impl SentimentClassifier for MlClient {
    async fn classify(&self, audio: &AudioBatch) -> DetectResult<SentimentScore> {
        let label = self
            .classify_sentiment(audio.sample_rate, &audio.samples)
            .await
            .map_err(|e| DetectError::collaborator("sentiment", e.to_string()))?;

        Ok(SentimentScore {
            label: label.label,
            score: label.score,
        })
    }
}

#[async_trait]
impl ViralPredictor for MlClient {
    async fn predict(&self, features: &[f64]) -> DetectResult<f64> {
        self.predict_viral(features)
            .await
            .map_err(|e| DetectError::collaborator("viral", e.to_string()))
    }
}
