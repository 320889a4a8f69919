//! Stream detection worker.
//!
//! Runs the `dcs-detect` pipeline over a set of source streams with
//! bounded concurrency and writes one JSON detection report per
//! stream.

pub mod config;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod processor;
pub mod report;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::StreamExecutor;
pub use report::{DetectionReport, MomentReport};
