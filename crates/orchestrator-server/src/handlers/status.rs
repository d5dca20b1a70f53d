//! `GET /api/v1/jobs/{job_id}` (spec.md §4.C4 `get_status()`).

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

use orchestrator_core::types::JobId;
use orchestrator_core::OrchestratorError;

use crate::{error::AppError, state::AppState};

/// Masks admission write-lag between C4's insert and a client's immediate
/// follow-up read (spec.md §4.C1, S6): one 1-second retry before a miss is
/// surfaced to the client as 404.
const READ_AFTER_WRITE_RETRY_DELAY: Duration = Duration::from_secs(1);

pub async fn get_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let job_id = JobId(job_id);

    let record = match state.jobs.get(job_id).await {
        Ok(record) => record,
        Err(OrchestratorError::NotFound(_)) => {
            tokio::time::sleep(READ_AFTER_WRITE_RETRY_DELAY).await;
            state.jobs.get(job_id).await?
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(json!({
        "job_id": record.job_id.to_string(),
        "status": record.status.as_str(),
        "job_type": record.job_type,
        "worker_job_id": record.worker_job_id,
        "result_url": record.result_url,
        "error": record.error_message,
        "created_at": record.created_at,
        "updated_at": record.updated_at,
    })))
}
