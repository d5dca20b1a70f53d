//! Storage and collaborator port traits — implemented by `orchestrator-postgres`
//! (C1, C2) and `orchestrator-client` (C3's host controller, C5's engine client).
//! Core/server/adapter logic depends only on these traits, never on sqlx or
//! reqwest directly — mirrors `sem_os_core::ports`.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    EnginePollResult, EngineSubmission, HostState, JobId, JobSummary, JobStatus, NewJob,
    QueueMessage, ReceiptToken, ReceivedMessage,
};

/// C1 — durable key-value store of job records (spec.md §4.C1).
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a PENDING record iff `job_id` is unseen. Re-delivery of a
    /// duplicate submission must not clobber a later status.
    async fn put_if_absent(&self, job: NewJob) -> Result<()>;

    async fn get(&self, job_id: JobId) -> Result<crate::types::JobRecord>;

    /// PENDING → PROCESSING. Idempotent re-entry is permitted (spec.md §3).
    async fn mark_processing(&self, job_id: JobId, worker_job_id: Option<&str>) -> Result<()>;

    /// PROCESSING → COMPLETED. No-op if the record is already terminal.
    async fn mark_completed(&self, job_id: JobId, result_url: &str) -> Result<()>;

    /// PROCESSING → FAILED. No-op if the record is already terminal.
    async fn mark_failed(&self, job_id: JobId, error_message: &str) -> Result<()>;

    async fn query_by_status(&self, status: JobStatus, limit: i64) -> Result<Vec<JobSummary>>;
}

/// C2 — one independent at-least-once lane with a visibility-timeout
/// protocol and a dead-letter companion (spec.md §4.C2). One instance per
/// lane; the lane's identity is baked into the concrete adapter.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    async fn enqueue(&self, message: QueueMessage) -> Result<()>;

    /// Blocks up to `max_wait` for one message. On return the message is
    /// invisible to other receivers for `visibility`.
    async fn long_receive(
        &self,
        max_wait: Duration,
        visibility: Duration,
    ) -> Result<Option<ReceivedMessage>>;

    /// Permanently remove a message. Only ever called on terminal state.
    async fn delete(&self, receipt: &ReceiptToken) -> Result<()>;

    /// Keep a lease alive across poll cycles. Not used by the mandated
    /// design but available to implementers (spec.md §4.C2).
    async fn extend(&self, receipt: &ReceiptToken, extra: Duration) -> Result<()>;

    /// Approximate count of currently-visible (not leased, not dead-lettered)
    /// messages — feeds the idle-watcher's 6-sample average (spec.md §4.C3).
    async fn approx_visible_count(&self) -> Result<i64>;

    /// Sweep messages past the main-queue (1 day) or DLQ (14 day) retention
    /// window. Returns (main_purged, dlq_purged).
    async fn purge_expired(&self) -> Result<(u64, u64)>;
}

/// C3 — controller for the single external GPU worker host handle
/// (spec.md §4.C3). Start/stop are idempotent on same-state.
#[async_trait]
pub trait WorkerHostController: Send + Sync {
    async fn describe_state(&self) -> Result<HostState>;
    async fn start(&self) -> Result<()>;
    async fn stop(&self) -> Result<()>;

    /// Debug-only IP lookup backing the façade's background refresh cache
    /// (spec.md §4.C4's "cached worker-IP value", §9's redesign hint that
    /// it "must not gate request handling"). `None` when not yet known.
    async fn describe_ip(&self) -> Result<Option<String>>;
}

/// Thin pass-through to the external artifact object store backing
/// `result_url` (spec.md §6: "Artifact location: external object store;
/// URLs are opaque strings persisted into `result_url`", and the façade's
/// `DELETE /api/v1/images/{object_key}` operation).
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    async fn delete(&self, object_key: &str) -> Result<()>;
}

/// C5's engine-facing HTTP contract (spec.md §6).
#[async_trait]
pub trait InferenceEngineClient: Send + Sync {
    async fn submit(
        &self,
        job_type: &str,
        request_body: &serde_json::Value,
    ) -> Result<EngineSubmission>;

    async fn poll(&self, engine_job_id: &str) -> Result<EnginePollResult>;
}
