//! In-memory fake port implementations for handler/background-task unit
//! tests (SPEC_FULL.md §2: "so the test suite does not require a live
//! Postgres instance"). Only compiled for tests — never shipped.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use orchestrator_core::error::{OrchestratorError, Result};
use orchestrator_core::ports::{JobStore, ObjectStoreClient, WorkQueue, WorkerHostController};
use orchestrator_core::types::{
    HostState, JobId, JobRecord, JobStatus, JobSummary, NewJob, QueueMessage, ReceiptToken,
    ReceivedMessage,
};

#[derive(Default)]
pub struct FakeJobStore {
    records: Mutex<std::collections::HashMap<JobId, JobRecord>>,
}

#[async_trait]
impl JobStore for FakeJobStore {
    async fn put_if_absent(&self, job: NewJob) -> Result<()> {
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

/// Single-lane in-memory queue. `fail` simulates `QueueUnavailable` on every
/// call — used to exercise the façade's "enqueue fails" admission path.
pub struct FakeWorkQueue {
    messages: Mutex<VecDeque<QueueMessage>>,
    fail: bool,
}

impl Default for FakeWorkQueue {
    fn default() -> Self {
        Self {
            messages: Mutex::new(VecDeque::new()),
            fail: false,
        }
    }
}

impl FakeWorkQueue {
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(VecDeque::new()),
            fail: true,
        }
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
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
        Ok(())
    }

    async fn extend(&self, _receipt: &ReceiptToken, _extra: Duration) -> Result<()> {
        Ok(())
    }

    async fn approx_visible_count(&self) -> Result<i64> {
        if self.fail {
            return Err(OrchestratorError::QueueUnavailable("fake failure".into()));
        }
        Ok(self.messages.lock().unwrap().len() as i64)
    }

    async fn purge_expired(&self) -> Result<(u64, u64)> {
        Ok((0, 0))
    }
}

pub struct FakeWorkerHostController {
    state: Mutex<HostState>,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
}

impl FakeWorkerHostController {
    pub fn new(state: HostState) -> Self {
        Self {
            state: Mutex::new(state),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
        }
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkerHostController for FakeWorkerHostController {
    async fn describe_state(&self) -> Result<HostState> {
        Ok(*self.state.lock().unwrap())
    }

    async fn start(&self) -> Result<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        *self.state.lock().unwrap() = HostState::Pending;
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        *self.state.lock().unwrap() = HostState::Stopped;
        Ok(())
    }

    async fn describe_ip(&self) -> Result<Option<String>> {
        Ok(Some("10.0.0.1".to_string()))
    }
}

#[derive(Default)]
pub struct FakeObjectStoreClient {
    deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl ObjectStoreClient for FakeObjectStoreClient {
    async fn delete(&self, object_key: &str) -> Result<()> {
        self.deleted.lock().unwrap().push(object_key.to_string());
        Ok(())
    }
}
