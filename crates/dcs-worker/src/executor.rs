//! Stream executor: bounded-concurrency detection over a stream list.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Semaphore};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::metrics;
use crate::processor::{process_stream, ProcessingContext};

/// Runs detection over a finite set of streams with a bounded worker
/// pool. Each stream run is independent; one failing stream never
/// affects the others.
pub struct StreamExecutor {
    config: WorkerConfig,
    ctx: Arc<ProcessingContext>,
    stream_semaphore: Arc<Semaphore>,
    shutdown: watch::Sender<bool>,
    worker_name: String,
}

impl StreamExecutor {
    pub fn new(config: WorkerConfig, ctx: ProcessingContext) -> Self {
        let stream_semaphore = Arc::new(Semaphore::new(config.max_concurrent_streams));
        let (shutdown, _) = watch::channel(false);
        let worker_name = format!("detector-{}", Uuid::new_v4());

        Self {
            config,
            ctx: Arc::new(ctx),
            stream_semaphore,
            shutdown,
            worker_name,
        }
    }

    /// Process every source, returning the paths of written reports.
    ///
    /// Streams are admitted in input order as pool slots free up, so
    /// the returned paths follow input order. A cancelled run stops
    /// admitting streams; in-flight runs finish their current batch
    /// and flush partial reports.
    pub async fn run(&self, sources: Vec<String>) -> WorkerResult<Vec<PathBuf>> {
        info!(
            worker = %self.worker_name,
            streams = sources.len(),
            max_concurrent = self.config.max_concurrent_streams,
            "Starting stream executor"
        );

        let mut handles = Vec::with_capacity(sources.len());
        let shutdown_rx = self.shutdown.subscribe();

        for source in sources {
            if *shutdown_rx.borrow() {
                warn!(source, "Shutdown in progress, skipping stream");
                continue;
            }

            let permit = self
                .stream_semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| WorkerError::processing_failed("Stream pool closed"))?;

            let ctx = Arc::clone(&self.ctx);
            let cancel = self.shutdown.subscribe();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let result = process_stream(&ctx, &source, Some(cancel)).await;
                (source, result)
            }));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for result in futures::future::join_all(handles).await {
            match result {
                Ok((source, Ok(report))) => {
                    reports.push(PathBuf::from(&self.ctx.config.report_dir).join(format!(
                        "report-{}.json",
                        report.run_id
                    )));
                    if report.is_empty() {
                        warn!(source, "Stream produced an empty report");
                    }
                }
                Ok((source, Err(e))) => {
                    error!(source, error = %e, "Stream processing failed");
                    metrics::record_stream_failed("process");
                }
                Err(e) => {
                    error!(error = %e, "Stream task panicked");
                    metrics::record_stream_failed("join");
                }
            }
        }

        info!(
            worker = %self.worker_name,
            reports = reports.len(),
            "Stream executor finished"
        );
        Ok(reports)
    }

    /// Signal cooperative shutdown to all in-flight runs.
    pub fn shutdown(&self) {
        // send_replace: the signal must stick even with no active runs
        self.shutdown.send_replace(true);
    }

    /// Wait until every pool slot is free again, bounded by the
    /// configured shutdown timeout.
    pub async fn wait_for_streams(&self) {
        let deadline = tokio::time::Instant::now() + self.config.shutdown_timeout;
        loop {
            if self.stream_semaphore.available_permits() == self.config.max_concurrent_streams {
                break;
            }
            if tokio::time::Instant::now() >= deadline {
                warn!("Shutdown timeout reached with streams still in flight");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}
