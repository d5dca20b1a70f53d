//! In-memory fakes for `worker_loop` unit tests. Crate-local and
//! test-only, mirroring `orchestrator-server`'s own `test_support`
//! module — each crate that needs fakes grows its own rather than
//! sharing a cross-crate testing surface.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use orchestrator_core::error::{OrchestratorError, Result};
use orchestrator_core::ports::{InferenceEngineClient, JobStore, WorkQueue};
use orchestrator_core::types::{
    EnginePollResult, EngineStatus, EngineSubmission, JobId, JobRecord, JobStatus, JobSummary,
    NewJob, QueueMessage, ReceiptToken, ReceivedMessage,
};

#[derive(Default)]
pub struct FakeJobStore {
    records: Mutex<HashMap<JobId, JobRecord>>,
    fail: bool,
}

impl FakeJobStore {
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl JobStore for FakeJobStore {
    async fn put_if_absent(&self, job: NewJob) -> Result<()> {
        if self.fail {
            return Err(OrchestratorError::StoreUnavailable("fake failure".into()));
        }
        let mut records = self.records.lock().unwrap();
        records.entry(job.job_id).or_insert(JobRecord {
            job_id: job.job_id,
            status: JobStatus::Pending,
            job_type: job.job_type,
            request_body: job.request_body,
            created_at: job.created_at,
            updated_at: job.created_at,
            worker_job_id: None,
            result_url: None,
            error_message: None,
        });
        Ok(())
    }

    async fn get(&self, job_id: JobId) -> Result<JobRecord> {
        self.records
            .lock()
            .unwrap()
            .get(&job_id)
            .cloned()
            .ok_or_else(|| OrchestratorError::NotFound(job_id.to_string()))
    }

    async fn mark_processing(&self, job_id: JobId, worker_job_id: Option<&str>) -> Result<()> {
        if self.fail {
            return Err(OrchestratorError::StoreUnavailable("fake failure".into()));
        }
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.get_mut(&job_id) {
            if !record.status.is_terminal() {
                record.status = JobStatus::Processing;
                if let Some(id) = worker_job_id {
                    record.worker_job_id = Some(id.to_string());
                }
            }
        }
        Ok(())
    }

    async fn mark_completed(&self, job_id: JobId, result_url: &str) -> Result<()> {
        if self.fail {
            return Err(OrchestratorError::StoreUnavailable("fake failure".into()));
        }
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.get_mut(&job_id) {
            if !record.status.is_terminal() {
                record.status = JobStatus::Completed;
                record.result_url = Some(result_url.to_string());
            }
        }
        Ok(())
    }

    async fn mark_failed(&self, job_id: JobId, error_message: &str) -> Result<()> {
        if self.fail {
            return Err(OrchestratorError::StoreUnavailable("fake failure".into()));
        }
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.get_mut(&job_id) {
            if !record.status.is_terminal() {
                record.status = JobStatus::Failed;
                record.error_message = Some(error_message.to_string());
            }
        }
        Ok(())
    }

    async fn query_by_status(&self, status: JobStatus, limit: i64) -> Result<Vec<JobSummary>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .filter(|r| r.status == status)
            .take(limit.max(0) as usize)
            .map(|r| JobSummary {
                job_id: r.job_id,
                status: r.status,
                job_type: r.job_type.clone(),
                created_at: r.created_at,
            })
            .collect())
    }
}

#[derive(Default)]
pub struct FakeWorkQueue {
    messages: Mutex<VecDeque<QueueMessage>>,
    fail: bool,
    delete_calls: AtomicUsize,
}

impl FakeWorkQueue {
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(VecDeque::new()),
            fail: true,
            delete_calls: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkQueue for FakeWorkQueue {
    async fn enqueue(&self, message: QueueMessage) -> Result<()> {
        if self.fail {
            return Err(OrchestratorError::QueueUnavailable("fake failure".into()));
        }
        self.messages.lock().unwrap().push_back(message);
        Ok(())
    }

    async fn long_receive(
        &self,
        _max_wait: Duration,
        _visibility: Duration,
    ) -> Result<Option<ReceivedMessage>> {
        if self.fail {
            return Err(OrchestratorError::QueueUnavailable("fake failure".into()));
        }
        let message = self.messages.lock().unwrap().pop_front();
        Ok(message.map(|message| ReceivedMessage {
            message,
            receipt_token: ReceiptToken("fake-receipt".into()),
            receive_count: 1,
        }))
    }

    async fn delete(&self, _receipt: &ReceiptToken) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn extend(&self, _receipt: &ReceiptToken, _extra: Duration) -> Result<()> {
        Ok(())
    }

    async fn approx_visible_count(&self) -> Result<i64> {
        Ok(self.messages.lock().unwrap().len() as i64)
    }

    async fn purge_expired(&self) -> Result<(u64, u64)> {
        Ok((0, 0))
    }
}

/// Controls how the engine responds to `submit`/`poll`, covering the three
/// terminal shapes `worker_loop` reconciles: a clean completion, a submit
/// rejection, and an engine-reported failure.
pub struct FakeInferenceEngineClient {
    submit_fails: bool,
    result: EnginePollResult,
}

impl FakeInferenceEngineClient {
    pub fn completing(result_url: impl Into<String>) -> Self {
        Self {
            submit_fails: false,
            result: EnginePollResult {
                status: EngineStatus::Completed,
                result_s3_uri: Some(result_url.into()),
                error: None,
            },
        }
    }

    pub fn completing_with_failure(error: impl Into<String>) -> Self {
        Self {
            submit_fails: false,
            result: EnginePollResult {
                status: EngineStatus::Failed,
                result_s3_uri: None,
                error: Some(error.into()),
            },
        }
    }

    pub fn failing_submit() -> Self {
        Self {
            submit_fails: true,
            result: EnginePollResult {
                status: EngineStatus::Failed,
                result_s3_uri: None,
                error: None,
            },
        }
    }
}

#[async_trait]
impl InferenceEngineClient for FakeInferenceEngineClient {
    async fn submit(
        &self,
        _job_type: &str,
        _request_body: &serde_json::Value,
    ) -> Result<EngineSubmission> {
        if self.submit_fails {
            return Err(OrchestratorError::Internal(anyhow::anyhow!(
                "fake engine rejected submission"
            )));
        }
        Ok(EngineSubmission {
            engine_job_id: "engine-job-1".into(),
        })
    }

    async fn poll(&self, _engine_job_id: &str) -> Result<EnginePollResult> {
        Ok(self.result.clone())
    }
}
