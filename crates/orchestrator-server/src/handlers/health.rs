//! `GET /` (root info, SPEC_FULL.md §4) and `GET /health` / `GET
//! /api/v1/health` (spec.md §4.C4 `health()`, §6).

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use orchestrator_core::types::JobStatus;

use crate::{routes, state::AppState};

/// `GET /` — service name/version and the route table. Harmless and
/// present in both of the original façades (`cpu_orchestrator_api.py`'s
/// `GET /`).
pub async fn root() -> Json<Value> {
    Json(json!({
        "service": "orchestrator-server",
        "version": env!("CARGO_PKG_VERSION"),
        "routes": {
            "gpu_lane": routes::gpu_routes(),
            "cpu_lane": routes::cpu_routes(),
        },
    }))
}

/// Checks that the job store and both work-queue lanes are reachable
/// (spec.md §4.C4: "Checks that store and queue are reachable").
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store_ok = state
        .jobs
        .query_by_status(JobStatus::Pending, 1)
        .await
        .is_ok();
    let gpu_ok = state.gpu_queue.approx_visible_count().await.is_ok();
    let cpu_ok = state.cpu_queue.approx_visible_count().await.is_ok();
    let queue_ok = gpu_ok && cpu_ok;

    let healthy = store_ok && queue_ok;
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(json!({
            "status": if healthy { "ok" } else { "degraded" },
            "components": {
                "store": if store_ok { "ok" } else { "unreachable" },
                "queue": if queue_ok { "ok" } else { "unreachable" },
            },
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        FakeJobStore, FakeObjectStoreClient, FakeWorkQueue, FakeWorkerHostController,
    };
    use orchestrator_core::types::HostState;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[tokio::test]
    async fn reports_ok_when_store_and_queues_are_reachable() {
        let state = AppState {
            jobs: Arc::new(FakeJobStore::default()),
            gpu_queue: Arc::new(FakeWorkQueue::default()),
            cpu_queue: Arc::new(FakeWorkQueue::default()),
            host: Arc::new(FakeWorkerHostController::new(HostState::Stopped)),
            object_store: Arc::new(FakeObjectStoreClient::default()),
            cached_worker_ip: Arc::new(RwLock::new(None)),
        };

        let (status, Json(body)) = health(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn reports_degraded_when_a_queue_is_unreachable() {
        let state = AppState {
            jobs: Arc::new(FakeJobStore::default()),
            gpu_queue: Arc::new(FakeWorkQueue::failing()),
            cpu_queue: Arc::new(FakeWorkQueue::default()),
            host: Arc::new(FakeWorkerHostController::new(HostState::Stopped)),
            object_store: Arc::new(FakeObjectStoreClient::default()),
            cached_worker_ip: Arc::new(RwLock::new(None)),
        };

        let (status, Json(body)) = health(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["components"]["queue"], "unreachable");
    }
}
