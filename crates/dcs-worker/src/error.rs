//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Detection error: {0}")]
    Detect(#[from] dcs_detect::DetectError),

    #[error("ML service error: {0}")]
    Ml(#[from] dcs_ml_client::MlError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn processing_failed(msg: impl Into<String>) -> Self {
        Self::ProcessingFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
