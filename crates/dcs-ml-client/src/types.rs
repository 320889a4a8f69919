//! Inference service request/response types.

use serde::{Deserialize, Serialize};

/// Request for visual feature extraction over a frame batch.
///
/// Pixels are RGB24, frame-major, base64-encoded. The sidecar runs
/// them through its backbone and returns a per-frame spatial feature
/// map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRequest {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Number of frames in the batch
    pub frame_count: u32,
    /// Base64-encoded RGB24 pixel data, `frame_count * width * height * 3` bytes
    pub pixels_b64: String,
}

/// Feature tensor returned by the sidecar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureResponse {
    /// Tensor shape: frames x spatial positions x channels
    pub shape: [usize; 3],
    /// Row-major tensor data, `shape[0] * shape[1] * shape[2]` values
    pub data: Vec<f32>,
}

impl FeatureResponse {
    /// Check that `data` matches the declared shape.
    pub fn is_consistent(&self) -> bool {
        self.shape.iter().product::<usize>() == self.data.len()
    }
}

/// Request for audio sentiment classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentRequest {
    /// Sample rate of the audio window (Hz)
    pub sample_rate: u32,
    /// Base64-encoded mono s16le samples
    pub samples_b64: String,
}

/// Single top sentiment label with confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentLabel {
    /// `POSITIVE`, `NEGATIVE`, or `NEUTRAL`
    pub label: String,
    /// Confidence in [0, 1]
    pub score: f64,
}

/// Request for viral probability prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViralRequest {
    /// Combined feature vector (pooled visuals plus sentiment triple)
    pub features: Vec<f64>,
}

/// Viral probability returned by the sidecar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViralResponse {
    /// Probability in [0, 1]
    pub probability: f64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
}
