//! orchestrator-server — the GPU task orchestrator's façade (C4) and C3's
//! idle-watcher.
//!
//! Reads config from env vars (see `config::ServerConfig`):
//!   ORC_DATABASE_URL             — Postgres connection string (required)
//!   ORC_WORKER_HOST_CONTROL_URL  — worker-host control plane base URL (required)
//!   ORC_WORKER_HOST_ID           — managed worker host handle (required)
//!   ORC_OBJECT_STORE_BASE_URL    — artifact object store base URL (required)
//!   ORC_BIND_ADDR                — listen address (default 0.0.0.0:8080)
//!   ORC_CORS_ORIGINS             — comma-separated allowlist

use std::sync::Arc;
use std::time::Duration;

use orchestrator_client::{HttpObjectStoreClient, HttpWorkerHostController};
use orchestrator_core::ports::{JobStore, ObjectStoreClient, WorkQueue, WorkerHostController};
use orchestrator_postgres::PgStores;
use orchestrator_server::config::ServerConfig;
use orchestrator_server::router::build_router;
use orchestrator_server::state::AppState;
use orchestrator_server::{idle_watcher, ip_refresh, maintenance};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,orchestrator_server=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    orchestrator_postgres::schema::ensure_schema(&pool)
        .await
        .expect("failed to ensure schema");

    tracing::info!("connected to database");

    let stores = PgStores::new(pool);
    let jobs: Arc<dyn JobStore> = Arc::new(stores.jobs);
    let gpu_queue: Arc<dyn WorkQueue> = Arc::new(stores.gpu_queue);
    let cpu_queue: Arc<dyn WorkQueue> = Arc::new(stores.cpu_queue);

    let host: Arc<dyn WorkerHostController> = Arc::new(HttpWorkerHostController::new(
        config.worker_host_control_url.clone(),
        config.worker_host_id.clone(),
    ));
    let object_store: Arc<dyn ObjectStoreClient> =
        Arc::new(HttpObjectStoreClient::new(config.object_store_base_url.clone()));

    let cached_worker_ip = Arc::new(RwLock::new(None));

    let state = AppState {
        jobs,
        gpu_queue: gpu_queue.clone(),
        cpu_queue: cpu_queue.clone(),
        host: host.clone(),
        object_store,
        cached_worker_ip: cached_worker_ip.clone(),
    };

    // C3's idle-watcher (spec.md §4.C3).
    let watcher = idle_watcher::IdleWatcher::new(
        gpu_queue.clone(),
        host.clone(),
        Duration::from_secs(config.idle_check_interval_sec),
        config.idle_consecutive_samples,
    );
    tokio::spawn(watcher.run());

    // Debug-only worker-IP refresh cache (SPEC_FULL.md §4).
    tokio::spawn(ip_refresh::run(
        host.clone(),
        cached_worker_ip,
        Duration::from_secs(300),
    ));

    // Queue/DLQ retention sweep (SPEC_FULL.md §4).
    tokio::spawn(maintenance::run(gpu_queue, cpu_queue));

    let app = build_router(state, &config.cors_origins);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {}: {e}", config.bind_addr));
    tracing::info!("orchestrator-server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("server error");
}
