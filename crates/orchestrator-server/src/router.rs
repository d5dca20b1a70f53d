//! Router construction for the GPU task orchestrator façade (spec.md §6).

use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, state::AppState};

/// Builds the full axum router. CORS is restricted to the configured
/// origin allowlist (spec.md §6: "CORS is enabled with an
/// environment-provided comma-separated origin allowlist").
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        .route("/api/v1/health", get(handlers::health::health))
        .route("/api/v1/jobs/:job_id", get(handlers::status::get_status))
        .route(
            "/api/v1/images/:object_key",
            delete(handlers::delete_artifact::delete_artifact),
        )
        // Literal CPU-lane paths (spec.md §6).
        .route(
            "/api/v1/face-mask/tasks",
            post(handlers::submit::submit_face_mask),
        )
        .route(
            "/api/v1/full-face-swap/tasks",
            post(handlers::submit::submit_full_face_swap),
        )
        // Generic closed route set (spec.md §6's submit table).
        .route("/api/v1/:route/jobs", post(handlers::submit::submit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
