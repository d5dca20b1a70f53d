//! Error handling for the axum façade.
//! Maps `OrchestratorError` to HTTP status codes and JSON error bodies
//! (spec.md §7). Mirrors `sem_os_server::error::AppError`.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use orchestrator_core::OrchestratorError;
use serde_json::json;

pub struct AppError(OrchestratorError);

impl From<OrchestratorError> for AppError {
    fn from(e: OrchestratorError) -> Self {
        Self(e)
    }
}

impl AppError {
    pub fn inner(&self) -> &OrchestratorError {
        &self.0
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = json!({
            "error": self.0.to_string(),
            "code": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
