//! Inference sidecar HTTP client.

use std::time::Duration;

use base64::Engine as _;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{MlError, MlResult};
use crate::types::{
    FeatureRequest, FeatureResponse, HealthResponse, SentimentLabel, SentimentRequest,
    ViralRequest, ViralResponse,
};

/// Configuration for the inference client.
#[derive(Debug, Clone)]
pub struct MlClientConfig {
    /// Base URL of the inference service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries
    pub max_retries: u32,
}

impl Default for MlClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }
}

impl MlClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("ML_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            timeout: Duration::from_secs(
                std::env::var("ML_SERVICE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            max_retries: std::env::var("ML_SERVICE_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        }
    }
}

/// Client for the Python inference service.
pub struct MlClient {
    http: Client,
    config: MlClientConfig,
}

impl MlClient {
    /// Create a new inference client.
    pub fn new(config: MlClientConfig) -> MlResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(MlError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> MlResult<Self> {
        Self::new(MlClientConfig::from_env())
    }

    /// Check if the inference service is healthy.
    pub async fn health_check(&self) -> MlResult<bool> {
        let url = format!("{}/health", self.config.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("Inference service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Inference service health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Extract per-frame spatial feature maps for a raw RGB24 frame batch.
    pub async fn extract_features(
        &self,
        width: u32,
        height: u32,
        frame_count: u32,
        pixels: &[u8],
    ) -> MlResult<FeatureResponse> {
        let request = FeatureRequest {
            width,
            height,
            frame_count,
            pixels_b64: base64::engine::general_purpose::STANDARD.encode(pixels),
        };

        let response: FeatureResponse = self.post_json("features", &request).await?;
        if !response.is_consistent() {
            return Err(MlError::InvalidResponse(format!(
                "feature tensor shape {:?} does not match {} values",
                response.shape,
                response.data.len()
            )));
        }
        Ok(response)
    }

    /// Classify the sentiment of a mono s16le audio window.
    pub async fn classify_sentiment(
        &self,
        sample_rate: u32,
        samples: &[u8],
    ) -> MlResult<SentimentLabel> {
        let request = SentimentRequest {
            sample_rate,
            samples_b64: base64::engine::general_purpose::STANDARD.encode(samples),
        };

        self.post_json("sentiment", &request).await
    }

    /// Predict viral probability for a combined feature vector.
    pub async fn predict_viral(&self, features: &[f64]) -> MlResult<f64> {
        let request = ViralRequest {
            features: features.to_vec(),
        };

        let response: ViralResponse = self.post_json("viral", &request).await?;
        if !(0.0..=1.0).contains(&response.probability) {
            return Err(MlError::InvalidResponse(format!(
                "viral probability {} outside [0, 1]",
                response.probability
            )));
        }
        Ok(response.probability)
    }

    /// POST a JSON request with retry and decode the JSON response.
    async fn post_json<Req, Resp>(&self, endpoint: &str, request: &Req) -> MlResult<Resp>
    where
        Req: serde::Serialize,
        Resp: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{}", self.config.base_url, endpoint);
        debug!("Sending inference request to {}", url);

        let response = self
            .with_retry(|| async {
                self.http
                    .post(&url)
                    .json(request)
                    .send()
                    .await
                    .map_err(MlError::Network)
            })
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MlError::RequestFailed(format!(
                "inference service returned {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> MlResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = MlResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Inference request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(MlError::RequestFailed("Unknown error".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> MlClient {
        MlClient::new(MlClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
            max_retries: 0,
        })
        .unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = MlClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8001");
        assert_eq!(config.max_retries, 2);
    }

    #[tokio::test]
    async fn test_health_check_healthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "healthy",
                "version": "1.2.0"
            })))
            .mount(&server)
            .await;

        assert!(client_for(&server).health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_predict_viral_rejects_out_of_range() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/viral"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "probability": 1.7 })),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).predict_viral(&[0.1, 0.2]).await;
        assert!(matches!(result, Err(MlError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_extract_features_rejects_shape_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/features"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "shape": [1, 2, 3],
                "data": [0.0, 0.0]
            })))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .extract_features(8, 8, 1, &[0u8; 192])
            .await;
        assert!(matches!(result, Err(MlError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_sentiment_decodes_label() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sentiment"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "label": "POSITIVE",
                "score": 0.91
            })))
            .mount(&server)
            .await;

        let label = client_for(&server)
            .classify_sentiment(16_000, &[0u8; 64])
            .await
            .unwrap();
        assert_eq!(label.label, "POSITIVE");
        assert!((label.score - 0.91).abs() < 1e-9);
    }
}
