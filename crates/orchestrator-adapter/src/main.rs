//! orchestrator-adapter — the worker-side bridge (C5) between one
//! work-queue lane and the local inference engine. One process per lane;
//! run one instance per worker host alongside the engine it serves.
//!
//! Config (see `config::AdapterConfig`):
//!   --lane / ORC_LANE            — gpu or cpu (required)
//!   ORC_DATABASE_URL             — Postgres connection string (required)
//!   ORC_ENGINE_BASE_URL          — inference engine base URL (default http://localhost:8000)
//!   ORC_POLL_INTERVAL_SEC        — long-receive wait time (default 20)

mod config;
#[cfg(test)]
mod test_support;
mod worker_loop;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use orchestrator_client::HttpEngineClient;
use orchestrator_core::ports::{InferenceEngineClient, JobStore, WorkQueue};
use orchestrator_core::types::Lane;
use orchestrator_postgres::PgStores;
use sqlx::postgres::PgPoolOptions;

use config::{AdapterConfig, Cli};
use worker_loop::WorkerAdapter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,orchestrator_adapter=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = AdapterConfig::from_env(cli.lane.into());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    orchestrator_postgres::schema::ensure_schema(&pool)
        .await
        .expect("failed to ensure schema");

    let stores = PgStores::new(pool);
    let jobs: Arc<dyn JobStore> = Arc::new(stores.jobs);
    let queue: Arc<dyn WorkQueue> = match config.lane {
        Lane::Gpu => Arc::new(stores.gpu_queue),
        Lane::Cpu => Arc::new(stores.cpu_queue),
    };
    let engine: Arc<dyn InferenceEngineClient> =
        Arc::new(HttpEngineClient::new(config.engine_base_url.clone()));

    let shutdown = Arc::new(AtomicBool::new(false));
    spawn_signal_handlers(shutdown.clone());

    tracing::info!(
        lane = %config.lane,
        engine_base_url = %config.engine_base_url,
        "orchestrator-adapter starting"
    );

    let adapter = WorkerAdapter::new(
        jobs,
        queue,
        engine,
        Duration::from_secs(config.poll_interval_sec),
        Duration::from_secs(config.lane.default_visibility_sec()),
        shutdown,
    );
    adapter.run().await;
}

/// Mirrors `sqs_adapter.py`'s `signal.signal(SIGTERM/SIGINT, signal_handler)`.
fn spawn_signal_handlers(shutdown: Arc<AtomicBool>) {
    tokio::spawn(async move {
        let mut term = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("received SIGINT, initiating graceful shutdown");
            }
            _ = term.recv() => {
                tracing::info!("received SIGTERM, initiating graceful shutdown");
            }
        }
        shutdown.store(true, Ordering::SeqCst);
    });
}
