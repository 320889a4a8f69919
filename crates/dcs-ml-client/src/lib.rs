//! Client for the Python inference sidecar.
//!
//! The three scoring models the pipeline depends on (visual feature
//! extraction, audio sentiment, viral prediction) run in a separate
//! Python service. This crate provides the HTTP client for that
//! service; the pipeline itself only sees the scoring traits defined
//! in `dcs-detect`.

pub mod client;
pub mod error;
pub mod types;

pub use client::{MlClient, MlClientConfig};
pub use error::{MlError, MlResult};
pub use types::{
    FeatureRequest, FeatureResponse, SentimentLabel, SentimentRequest, ViralRequest, ViralResponse,
};
