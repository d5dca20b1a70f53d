//! Postgres-backed Work Queue lane (C2, spec.md §4.C2).
//!
//! A literal SQS lane isn't available in this workspace's stack, so the
//! lane is modeled as two Postgres tables (`orchestrator.queue_messages`,
//! `orchestrator.dead_letter_messages`) and the exclusive-lease claim uses
//! `FOR UPDATE SKIP LOCKED` — the same pattern
//! `sem_os_postgres::store::PgOutboxStore::claim_next` uses to hand exactly
//! one concurrent claimer a row. `long_receive` emulates SQS long-polling
//! with a short internal poll loop bounded by `max_wait`.

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use orchestrator_core::error::{OrchestratorError, Result};
use orchestrator_core::ports::WorkQueue;
use orchestrator_core::types::{JobId, Lane, QueueMessage, ReceiptToken, ReceivedMessage};

/// Poll interval for the internal long-receive loop.
const RECEIVE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// spec.md §4.C2: "On the k-th receive with k > max_receive_count = 3, the
/// message is automatically moved to the dead-letter companion."
const MAX_RECEIVE_COUNT: i32 = 3;

/// spec.md §4.C2 retention.
const MAIN_QUEUE_RETENTION_DAYS: i64 = 1;
const DLQ_RETENTION_DAYS: i64 = 14;

pub struct PgWorkQueue {
    pool: PgPool,
    lane: Lane,
}

impl PgWorkQueue {
    pub fn new(pool: PgPool, lane: Lane) -> Self {
        Self { pool, lane }
    }

    /// Move any message whose next redelivery would exceed the retry bound
    /// into the dead-letter companion. Run at the top of every claim
    /// attempt, not just on an explicit consumer failure — a message that
    /// simply never gets deleted (visibility keeps expiring) must still
    /// reach the DLQ.
    async fn promote_overdue_to_dlq(&self) -> Result<()> {
        sqlx::query(
            r#"
            WITH promoted AS (
                DELETE FROM orchestrator.queue_messages
                WHERE lane = $1
                  AND visible_at <= now()
                  AND receive_count >= $2
                RETURNING message_id, job_id, job_type, request_body, receive_count, created_at
            )
            INSERT INTO orchestrator.dead_letter_messages
                (message_id, lane, job_id, job_type, request_body, receive_count, created_at)
            SELECT message_id, $1, job_id, job_type, request_body, receive_count, created_at
            FROM promoted
            "#,
        )
        .bind(self.lane.as_str())
        .bind(MAX_RECEIVE_COUNT)
        .execute(&self.pool)
        .await
        .map_err(|e| OrchestratorError::QueueUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn try_claim_once(&self, visibility: Duration) -> Result<Option<ReceivedMessage>> {
        self.promote_overdue_to_dlq().await?;

        let receipt = Uuid::new_v4();
        let row = sqlx::query_as::<_, (Uuid, Uuid, String, serde_json::Value, i32)>(
            r#"
            WITH claimable AS (
                SELECT message_id
                FROM orchestrator.queue_messages
                WHERE lane = $1
                  AND visible_at <= now()
                ORDER BY created_at
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            UPDATE orchestrator.queue_messages q
            SET receive_count = receive_count + 1,
                receipt_token = $2,
                visible_at = now() + make_interval(secs => $3)
            FROM claimable c
            WHERE q.message_id = c.message_id
            RETURNING q.message_id, q.job_id, q.job_type, q.request_body, q.receive_count
            "#,
        )
        .bind(self.lane.as_str())
        .bind(receipt)
        .bind(visibility.as_secs_f64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| OrchestratorError::QueueUnavailable(e.to_string()))?;

        Ok(row.map(|(message_id, job_id, job_type, request_body, receive_count)| {
            let _ = message_id;
            ReceivedMessage {
                message: QueueMessage {
                    job_id: JobId(job_id),
                    job_type,
                    request_body,
                },
                receipt_token: ReceiptToken(receipt.to_string()),
                receive_count,
            }
        }))
    }
}


#[async_trait]
impl WorkQueue for PgWorkQueue {
    async fn enqueue(&self, message: QueueMessage) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO orchestrator.queue_messages
                (message_id, lane, job_id, job_type, request_body, receive_count, visible_at, created_at)
            VALUES (gen_random_uuid(), $1, $2, $3, $4, 0, now(), now())
            "#,
        )
        .bind(self.lane.as_str())
        .bind(message.job_id.0)
        .bind(&message.job_type)
        .bind(&message.request_body)
        .execute(&self.pool)
        .await
        .map_err(|e| OrchestratorError::QueueUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn long_receive(
        &self,
        max_wait: Duration,
        visibility: Duration,
    ) -> Result<Option<ReceivedMessage>> {
        let deadline = tokio::time::Instant::now() + max_wait;
        loop {
            if let Some(received) = self.try_claim_once(visibility).await? {
                return Ok(Some(received));
            }
            if tokio::time::Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(RECEIVE_POLL_INTERVAL.min(max_wait)).await;
        }
    }

    async fn delete(&self, receipt: &ReceiptToken) -> Result<()> {
        let token = Uuid::parse_str(&receipt.0)
            .map_err(|e| OrchestratorError::Internal(anyhow!(e)))?;
        sqlx::query(
            r#"DELETE FROM orchestrator.queue_messages WHERE lane = $1 AND receipt_token = $2"#,
        )
        .bind(self.lane.as_str())
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| OrchestratorError::QueueUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn extend(&self, receipt: &ReceiptToken, extra: Duration) -> Result<()> {
        let token = Uuid::parse_str(&receipt.0)
            .map_err(|e| OrchestratorError::Internal(anyhow!(e)))?;
        sqlx::query(
            r#"
            UPDATE orchestrator.queue_messages
            SET visible_at = visible_at + make_interval(secs => $3)
            WHERE lane = $1 AND receipt_token = $2
            "#,
        )
        .bind(self.lane.as_str())
        .bind(token)
        .bind(extra.as_secs_f64())
        .execute(&self.pool)
        .await
        .map_err(|e| OrchestratorError::QueueUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn approx_visible_count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT count(*) FROM orchestrator.queue_messages
            WHERE lane = $1 AND visible_at <= now()
            "#,
        )
        .bind(self.lane.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| OrchestratorError::QueueUnavailable(e.to_string()))?;
        Ok(count)
    }

    async fn purge_expired(&self) -> Result<(u64, u64)> {
        let main_cutoff: DateTime<Utc> = Utc::now() - chrono::Duration::days(MAIN_QUEUE_RETENTION_DAYS);
        let dlq_cutoff: DateTime<Utc> = Utc::now() - chrono::Duration::days(DLQ_RETENTION_DAYS);

        let main_result = sqlx::query(
            r#"DELETE FROM orchestrator.queue_messages WHERE lane = $1 AND created_at < $2"#,
        )
        .bind(self.lane.as_str())
        .bind(main_cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| OrchestratorError::QueueUnavailable(e.to_string()))?;

        let dlq_result = sqlx::query(
            r#"DELETE FROM orchestrator.dead_letter_messages WHERE lane = $1 AND created_at < $2"#,
        )
        .bind(self.lane.as_str())
        .bind(dlq_cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| OrchestratorError::QueueUnavailable(e.to_string()))?;

        Ok((main_result.rows_affected(), dlq_result.rows_affected()))
    }
}
