//! The C5 adapter loop (spec.md §4.C5): receive from a lane, hand the job
//! to the local inference engine, poll it to completion, and reconcile the
//! job record and queue message. Modeled directly on `sqs_adapter.py`'s
//! `main_loop`/`process_task`/`poll_api_status` shape, translated from its
//! exception-driven control flow into explicit `Result` branches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use orchestrator_core::error::Result;
use orchestrator_core::ports::{InferenceEngineClient, JobStore, WorkQueue};
use orchestrator_core::types::{EngineStatus, JobId, ReceiptToken};

/// `sqs_adapter.py`'s `max_consecutive_errors`.
const MAX_CONSECUTIVE_ERRORS: u32 = 10;
/// `sqs_adapter.py`'s `time.sleep(10)` on a receive-side `ClientError`.
const QUEUE_BACKOFF: Duration = Duration::from_secs(10);
/// `poll_api_status`'s `time.sleep(2)` between in-progress polls.
const ENGINE_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// `poll_api_status`'s `timeout: int = 600`.
const ENGINE_POLL_TIMEOUT: Duration = Duration::from_secs(600);

/// One receive-and-process attempt's outcome, used only to decide whether
/// the consecutive-error counter resets (spec.md §4.C5 step 7).
enum Outcome {
    NoMessage,
    Handled,
}

enum PollOutcome {
    Completed(String),
    Failed(String),
    TimedOut,
}

pub struct WorkerAdapter {
    jobs: Arc<dyn JobStore>,
    queue: Arc<dyn WorkQueue>,
    engine: Arc<dyn InferenceEngineClient>,
    poll_interval: Duration,
    visibility: Duration,
    shutdown: Arc<AtomicBool>,
}

impl WorkerAdapter {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        queue: Arc<dyn WorkQueue>,
        engine: Arc<dyn InferenceEngineClient>,
        poll_interval: Duration,
        visibility: Duration,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            jobs,
            queue,
            engine,
            poll_interval,
            visibility,
            shutdown,
        }
    }

    /// The adapter's main loop. Runs until the shutdown flag is set or the
    /// consecutive-error circuit breaker trips (spec.md §4.C5 step 7).
    pub async fn run(self) {
        let mut consecutive_errors: u32 = 0;

        while !self.shutdown.load(Ordering::SeqCst) {
            match self.receive_and_process().await {
                Ok(Outcome::Handled) => consecutive_errors = 0,
                Ok(Outcome::NoMessage) => {
                    tracing::debug!("no messages received");
                }
                Err(e) => {
                    consecutive_errors += 1;
                    tracing::error!("adapter iteration failed (#{consecutive_errors}): {e}");
                    if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                        tracing::error!(
                            "too many consecutive errors ({MAX_CONSECUTIVE_ERRORS}), stopping adapter"
                        );
                        break;
                    }
                    tokio::time::sleep(QUEUE_BACKOFF).await;
                }
            }
        }

        tracing::info!("adapter shutting down gracefully");
    }

    /// Steps 1-6 of spec.md §4.C5 for a single message, if one is available.
    async fn receive_and_process(&self) -> Result<Outcome> {
        // Step 1: long-poll receive. A queue-unavailable error here is the
        // only case that feeds the circuit breaker's backoff path directly
        // (SPEC_FULL.md §4's "queue-unreachable backoff").
        let received = match self.queue.long_receive(self.poll_interval, self.visibility).await? {
            Some(r) => r,
            None => return Ok(Outcome::NoMessage),
        };

        // Step 2 (decode): the message arrives already typed — the lane's
        // Postgres-backed queue stores `job_id`/`job_type`/`request_body`
        // directly rather than an opaque JSON blob an adapter must parse,
        // so there is no separate decode failure mode to model here.
        let job_id = received.message.job_id;
        let job_type = received.message.job_type.clone();
        let request_body = received.message.request_body.clone();
        let receipt = received.receipt_token.clone();

        // Step 3: PENDING -> PROCESSING. On failure, leave the message
        // alone — it becomes visible again once its lease expires.
        if let Err(e) = self.jobs.mark_processing(job_id, None).await {
            tracing::warn!(
                "job {job_id}: mark_processing failed, leaving message for redelivery: {e}"
            );
            return Ok(Outcome::Handled);
        }

        // Step 4: submit to the local inference engine.
        let submission = match self.engine.submit(&job_type, &request_body).await {
            Ok(s) => s,
            Err(e) => {
                self.finalize_failure(job_id, &receipt, &format!("engine submit failed: {e}"))
                    .await?;
                return Ok(Outcome::Handled);
            }
        };

        if let Err(e) = self
            .jobs
            .mark_processing(job_id, Some(&submission.engine_job_id))
            .await
        {
            tracing::warn!("job {job_id}: failed to record engine job id: {e}");
        }

        // Step 5: poll the engine to a terminal state or timeout.
        let outcome = self.poll_until_terminal(&submission.engine_job_id).await;

        // Step 6: finalize the job record and delete the message.
        match outcome {
            PollOutcome::Completed(result_url) => {
                self.finalize_success(job_id, &receipt, &result_url).await?;
            }
            PollOutcome::Failed(message) => {
                self.finalize_failure(job_id, &receipt, &message).await?;
            }
            PollOutcome::TimedOut => {
                self.finalize_failure(
                    job_id,
                    &receipt,
                    &format!("engine poll timed out after {}s", ENGINE_POLL_TIMEOUT.as_secs()),
                )
                .await?;
            }
        }

        Ok(Outcome::Handled)
    }

    async fn poll_until_terminal(&self, engine_job_id: &str) -> PollOutcome {
        let deadline = tokio::time::Instant::now() + ENGINE_POLL_TIMEOUT;

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                tracing::warn!("shutdown requested mid-poll for engine job {engine_job_id}");
                return PollOutcome::TimedOut;
            }
            if tokio::time::Instant::now() >= deadline {
                return PollOutcome::TimedOut;
            }

            match self.engine.poll(engine_job_id).await {
                Ok(result) => match result.status {
                    EngineStatus::Completed => {
                        return match result.result_s3_uri {
                            Some(url) => PollOutcome::Completed(url),
                            None => PollOutcome::Failed(
                                "engine reported completed without a result url".into(),
                            ),
                        };
                    }
                    EngineStatus::Failed => {
                        return PollOutcome::Failed(
                            result.error.unwrap_or_else(|| "engine reported failure".into()),
                        );
                    }
                    EngineStatus::Pending | EngineStatus::Processing => {
                        tokio::time::sleep(ENGINE_POLL_INTERVAL).await;
                    }
                },
                Err(e) => {
                    tracing::warn!("engine poll error for {engine_job_id}: {e}");
                    tokio::time::sleep(ENGINE_POLL_INTERVAL).await;
                }
            }
        }
    }

    /// Step 6's success path: write COMPLETED, then delete. Either write
    /// failing is the genuinely unexpected case of step 7 — surfaced to the
    /// caller so it counts toward the consecutive-error circuit breaker,
    /// and the message is left undeleted so it can be redelivered.
    async fn finalize_success(&self, job_id: JobId, receipt: &ReceiptToken, result_url: &str) -> Result<()> {
        self.jobs.mark_completed(job_id, result_url).await.map_err(|e| {
            tracing::error!("job {job_id}: failed to write COMPLETED: {e}");
            e
        })?;
        self.queue.delete(receipt).await.map_err(|e| {
            tracing::error!("job {job_id}: COMPLETED written but delete failed: {e}");
            e
        })
    }

    async fn finalize_failure(&self, job_id: JobId, receipt: &ReceiptToken, message: &str) -> Result<()> {
        self.jobs.mark_failed(job_id, message).await.map_err(|e| {
            tracing::error!("job {job_id}: failed to write FAILED: {e}");
            e
        })?;
        self.queue.delete(receipt).await.map_err(|e| {
            tracing::error!("job {job_id}: FAILED written but delete failed: {e}");
            e
        })
    }
}
