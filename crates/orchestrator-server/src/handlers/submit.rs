//! POST `/api/v1/<route>/jobs` and the two literal CPU-lane paths
//! (spec.md §4.C4 `submit()`, §6).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use orchestrator_core::types::{JobId, NewJob, QueueMessage};
use orchestrator_core::OrchestratorError;

use crate::{error::AppError, routes::lane_for_route, state::AppState};

/// `POST /api/v1/:route/jobs` — generic admission across the closed route
/// set (spec.md §6's submit table).
pub async fn submit(
    State(state): State<AppState>,
    Path(route): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    submit_for_route(state, route, body).await
}

/// `POST /api/v1/face-mask/tasks` — literal CPU-lane path (spec.md §6).
pub async fn submit_face_mask(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    submit_for_route(state, "face-mask".to_string(), body).await
}

/// `POST /api/v1/full-face-swap/tasks` — literal CPU-lane path (spec.md §6).
pub async fn submit_full_face_swap(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    submit_for_route(state, "full-face-swap".to_string(), body).await
}

/// Admission itself (spec.md §4.C4 step list):
/// 1. generate job_id
/// 2. put-if-absent PENDING record — failure here returns 500, no enqueue.
/// 3. enqueue to the route's lane — failure here returns 500; the orphaned
///    PENDING record is tolerable (spec.md §4.C4's failure-mode table).
/// 4. invoke C3's cold-start — failure is swallowed, never fails admission.
/// 5. return 202 with the pending projection.
async fn submit_for_route(
    state: AppState,
    route: String,
    body: Value,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let lane = lane_for_route(&route)
        .ok_or_else(|| OrchestratorError::InvalidInput(format!("unknown route: {route}")))?;

    let job_id = JobId::new();
    let created_at = now_epoch();

    state
        .jobs
        .put_if_absent(NewJob {
            job_id,
            job_type: route.clone(),
            request_body: body.clone(),
            created_at,
        })
        .await?;

    state
        .queue_for(lane)
        .enqueue(QueueMessage {
            job_id,
            job_type: route,
            request_body: body,
        })
        .await?;

    if let Err(e) = orchestrator_core::host_control::cold_start(state.host.as_ref()).await {
        tracing::warn!("cold-start failed for job {job_id}: {e}");
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "job_id": job_id.to_string(),
            "status": "pending",
            "result_url": null,
            "error": null,
        })),
    ))
}

fn now_epoch() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use crate::test_support::{
        FakeJobStore, FakeObjectStoreClient, FakeWorkQueue, FakeWorkerHostController,
    };
    use orchestrator_core::ports::WorkerHostController;
    use orchestrator_core::types::HostState;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn test_state(
        host_state: HostState,
    ) -> (
        AppState,
        Arc<FakeWorkQueue>,
        Arc<FakeWorkQueue>,
        Arc<FakeWorkerHostController>,
    ) {
        let gpu_queue = Arc::new(FakeWorkQueue::default());
        let cpu_queue = Arc::new(FakeWorkQueue::default());
        let host = Arc::new(FakeWorkerHostController::new(host_state));
        let state = AppState {
            jobs: Arc::new(FakeJobStore::default()),
            gpu_queue: gpu_queue.clone(),
            cpu_queue: cpu_queue.clone(),
            host: host.clone(),
            object_store: Arc::new(FakeObjectStoreClient::default()),
            cached_worker_ip: Arc::new(RwLock::new(None)),
        };
        (state, gpu_queue, cpu_queue, host)
    }

    #[tokio::test]
    async fn rejects_unknown_route() {
        let (state, ..) = test_state(HostState::Stopped);
        let err = submit_for_route(state, "not-a-route".into(), json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.inner().http_status(), 400);
    }

    #[tokio::test]
    async fn admits_to_gpu_lane_and_returns_202() {
        let (state, gpu_queue, _cpu_queue, _host) = test_state(HostState::Stopped);
        let (status, Json(body)) = submit_for_route(
            state,
            "camera-angle".into(),
            json!({"image_url": "https://ex/a.png"}),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["status"], "pending");
        assert!(body["job_id"].is_string());
        assert_eq!(gpu_queue.len(), 1);
    }

    #[tokio::test]
    async fn admits_cpu_routes_to_the_cpu_lane() {
        let (state, _gpu_queue, cpu_queue, _host) = test_state(HostState::Running);
        submit_face_mask(
            State(state),
            Json(json!({"image_url": "https://ex/a.png"})),
        )
        .await
        .unwrap();

        assert_eq!(cpu_queue.len(), 1);
    }

    #[tokio::test]
    async fn cold_start_is_invoked_on_admission() {
        let (state, ..) = test_state(HostState::Stopped);
        let host = state.host.clone();
        submit_for_route(state, "camera-angle".into(), json!({}))
            .await
            .unwrap();

        // cold_start transitions Stopped -> Pending via start().
        assert_eq!(host.describe_state().await.unwrap(), HostState::Pending);
    }

    #[tokio::test]
    async fn enqueue_failure_does_not_admit_the_job() {
        let (mut state, ..) = test_state(HostState::Stopped);
        state.gpu_queue = Arc::new(FakeWorkQueue::failing());

        let err = submit_for_route(state, "camera-angle".into(), json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.inner().http_status(), 500);
    }
}
