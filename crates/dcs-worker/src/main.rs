//! Stream detection worker binary.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dcs_worker::config::detection_config_from_env;
use dcs_worker::processor::ProcessingContext;
use dcs_worker::{StreamExecutor, WorkerConfig};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("dcs=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting dcs-worker");

    let _metrics_handle = dcs_worker::metrics::init_metrics();

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let detection = detection_config_from_env();

    let sources: Vec<String> = std::env::args().skip(1).collect();
    if sources.is_empty() {
        error!("No stream sources given; usage: dcs-worker <stream>...");
        std::process::exit(2);
    }

    let ctx = match ProcessingContext::new(config.clone(), detection) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to create processing context: {}", e);
            std::process::exit(1);
        }
    };

    let executor = std::sync::Arc::new(StreamExecutor::new(config, ctx));

    // Setup signal handler for cooperative shutdown
    let signal_executor = std::sync::Arc::clone(&executor);
    let shutdown_handle = tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        signal_executor.shutdown();
        signal_executor.wait_for_streams().await;
    });

    match executor.run(sources).await {
        Ok(reports) => {
            info!("Wrote {} detection reports", reports.len());
        }
        Err(e) => {
            error!("Executor error: {}", e);
            std::process::exit(1);
        }
    }

    shutdown_handle.abort();
    info!("Worker shutdown complete");
}
