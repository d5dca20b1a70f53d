//! `DELETE /api/v1/images/{object_key}` (spec.md §4.C4 `delete_artifact()`,
//! §6): a thin pass-through to the external artifact object store.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::{error::AppError, state::AppState};

pub async fn delete_artifact(
    State(state): State<AppState>,
    Path(object_key): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.object_store.delete(&object_key).await?;
    Ok(Json(json!({
        "message": "deleted",
        "s3_key": object_key,
    })))
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
    async fn passes_through_to_the_object_store() {
        let state = AppState {
            jobs: Arc::new(FakeJobStore::default()),
            gpu_queue: Arc::new(FakeWorkQueue::default()),
            cpu_queue: Arc::new(FakeWorkQueue::default()),
            host: Arc::new(FakeWorkerHostController::new(HostState::Stopped)),
            object_store: Arc::new(FakeObjectStoreClient::default()),
            cached_worker_ip: Arc::new(RwLock::new(None)),
        };

        let Json(body) = delete_artifact(State(state), Path("results/a.png".into()))
            .await
            .unwrap();
        assert_eq!(body["s3_key"], "results/a.png");
    }
}
