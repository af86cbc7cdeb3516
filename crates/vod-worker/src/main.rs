//! Transcode worker binary.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vod_catalog::RedisCatalog;
use vod_media::SystemToolRunner;
use vod_queue::JobQueue;
use vod_storage::S3ObjectStore;
use vod_worker::{ConvertPipeline, JobExecutor, WorkerConfig};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS Redis/S3 endpoints)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("vod=info".parse().unwrap());

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

    info!("Starting vod-worker");

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    if let Some(addr) = config.metrics_listen {
        match metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
        {
            Ok(()) => info!("Prometheus exporter listening on {}", addr),
            Err(e) => error!("Failed to install Prometheus exporter: {}", e),
        }
    }

    let queue = match JobQueue::from_env() {
        Ok(q) => q,
        Err(e) => {
            error!("Failed to create job queue: {}", e);
            std::process::exit(1);
        }
    };

    let catalog = match RedisCatalog::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to create catalog client: {}", e);
            std::process::exit(1);
        }
    };

    let store = match S3ObjectStore::from_env() {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to create object store client: {}", e);
            std::process::exit(1);
        }
    };

    let pipeline = ConvertPipeline::new(
        catalog,
        store,
        Arc::new(SystemToolRunner::new()),
        config.media_root.clone(),
    );

    let executor = Arc::new(JobExecutor::new(config, queue, pipeline));

    // Shutdown on ctrl-c
    let executor_for_signal = Arc::clone(&executor);
    let shutdown_handle = tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        executor_for_signal.shutdown();
    });

    if let Err(e) = executor.run().await {
        error!("Executor error: {}", e);
        std::process::exit(1);
    }

    shutdown_handle.abort();

    info!("Worker shutdown complete");
}
