use thiserror::Error;

/// The error taxonomy of §7 in the orchestrator spec. Every variant maps to
/// a specific client-visible behavior at the façade or to a specific retry
/// policy at the adapter — see each call site.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("job store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("work queue unavailable: {0}")]
    QueueUnavailable(String),

    #[error("worker host control failed: {0}")]
    WorkerStartFailure(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl OrchestratorError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidInput(_) => 400,
            Self::StoreUnavailable(_) => 500,
            Self::QueueUnavailable(_) => 500,
            Self::WorkerStartFailure(_) => 500,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// Transient errors are the ones worth retrying (§4.C1's read-after-write
    /// retry, §4.C5 step 3's "do not delete, let visibility expire").
    /// Classified by variant, not by substring matching — resolves spec.md
    /// §9 Open Question 4.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::QueueUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_store_and_queue_unavailable_are_transient() {
        assert!(OrchestratorError::StoreUnavailable("x".into()).is_transient());
        assert!(OrchestratorError::QueueUnavailable("x".into()).is_transient());
        assert!(!OrchestratorError::NotFound("x".into()).is_transient());
        assert!(!OrchestratorError::InvalidInput("x".into()).is_transient());
        assert!(!OrchestratorError::WorkerStartFailure("x".into()).is_transient());
    }

    #[test]
    fn http_status_matches_error_taxonomy_table() {
        assert_eq!(OrchestratorError::NotFound("x".into()).http_status(), 404);
        assert_eq!(OrchestratorError::InvalidInput("x".into()).http_status(), 400);
        assert_eq!(OrchestratorError::Conflict("x".into()).http_status(), 409);
        assert_eq!(
            OrchestratorError::StoreUnavailable("x".into()).http_status(),
            500
        );
    }
}
