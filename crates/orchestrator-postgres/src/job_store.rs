//! Postgres-backed Job Store (C1, spec.md §4.C1).
//!
//! Table layout: one row per job in `orchestrator.jobs`, with a secondary
//! index over `(status, created_at DESC)` per spec.md §6. Terminal-state
//! writes are guarded in SQL (`WHERE status NOT IN ('completed','failed')`)
//! so a late-arriving redelivery can never clobber a terminal record —
//! the conditional-update strengthening spec.md §4.C1 calls optional.

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use orchestrator_core::error::{OrchestratorError, Result};
use orchestrator_core::ports::JobStore;
use orchestrator_core::types::{JobId, JobRecord, JobStatus, JobSummary, NewJob};

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct JobRow {
    job_id: Uuid,
    status: String,
    job_type: String,
    request_body: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    worker_job_id: Option<String>,
    result_url: Option<String>,
    error_message: Option<String>,
}

impl TryFrom<JobRow> for JobRecord {
    type Error = OrchestratorError;

    fn try_from(row: JobRow) -> Result<Self> {
        let status = row
            .status
            .parse::<JobStatus>()
            .map_err(|e| OrchestratorError::Internal(anyhow!(e)))?;
        Ok(JobRecord {
            job_id: JobId(row.job_id),
            status,
            job_type: row.job_type,
            request_body: row.request_body,
            created_at: row.created_at.timestamp(),
            updated_at: row.updated_at.timestamp(),
            worker_job_id: row.worker_job_id,
            result_url: row.result_url,
            error_message: row.error_message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(status: &str) -> JobRow {
        let now = Utc::now();
        JobRow {
            job_id: Uuid::new_v4(),
            status: status.to_string(),
            job_type: "camera-angle".to_string(),
            request_body: serde_json::json!({"image_url": "https://ex/a.png"}),
            created_at: now,
            updated_at: now,
            worker_job_id: None,
            result_url: None,
            error_message: None,
        }
    }

    #[test]
    fn row_converts_to_record_for_each_known_status() {
        for status in ["pending", "processing", "completed", "failed"] {
            let record: JobRecord = sample_row(status).try_into().unwrap();
            assert_eq!(record.status.as_str(), status);
        }
    }

    #[test]
    fn row_rejects_unknown_status_string() {
        let err = JobRecord::try_from(sample_row("archived")).unwrap_err();
        assert!(matches!(err, OrchestratorError::Internal(_)));
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn put_if_absent(&self, job: NewJob) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO orchestrator.jobs
                (job_id, status, job_type, request_body, created_at, updated_at)
            VALUES ($1, 'pending', $2, $3, to_timestamp($4), to_timestamp($4))
            ON CONFLICT (job_id) DO NOTHING
            "#,
        )
        .bind(job.job_id.0)
        .bind(&job.job_type)
        .bind(&job.request_body)
        .bind(job.created_at as f64)
        .execute(&self.pool)
        .await
        .map_err(|e| OrchestratorError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, job_id: JobId) -> Result<JobRecord> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT job_id, status::text, job_type, request_body,
                   created_at, updated_at, worker_job_id, result_url, error_message
            FROM orchestrator.jobs
            WHERE job_id = $1
            "#,
        )
        .bind(job_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| OrchestratorError::StoreUnavailable(e.to_string()))?;

        match row {
            Some(row) => row.try_into(),
            None => Err(OrchestratorError::NotFound(job_id.to_string())),
        }
    }

    async fn mark_processing(&self, job_id: JobId, worker_job_id: Option<&str>) -> Result<()> {
        // Idempotent re-entry permitted (spec.md §3): PROCESSING -> PROCESSING
        // is allowed, only a terminal record rejects the write.
        sqlx::query(
            r#"
            UPDATE orchestrator.jobs
            SET status = 'processing',
                worker_job_id = COALESCE($2, worker_job_id),
                updated_at = now()
            WHERE job_id = $1
              AND status NOT IN ('completed', 'failed')
            "#,
        )
        .bind(job_id.0)
        .bind(worker_job_id)
        .execute(&self.pool)
        .await
        .map_err(|e| OrchestratorError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn mark_completed(&self, job_id: JobId, result_url: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE orchestrator.jobs
            SET status = 'completed',
                result_url = $2,
                updated_at = now()
            WHERE job_id = $1
              AND status NOT IN ('completed', 'failed')
            "#,
        )
        .bind(job_id.0)
        .bind(result_url)
        .execute(&self.pool)
        .await
        .map_err(|e| OrchestratorError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn mark_failed(&self, job_id: JobId, error_message: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE orchestrator.jobs
            SET status = 'failed',
                error_message = $2,
                updated_at = now()
            WHERE job_id = $1
              AND status NOT IN ('completed', 'failed')
            "#,
        )
        .bind(job_id.0)
        .bind(error_message)
        .execute(&self.pool)
        .await
        .map_err(|e| OrchestratorError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn query_by_status(&self, status: JobStatus, limit: i64) -> Result<Vec<JobSummary>> {
        let rows = sqlx::query_as::<_, (Uuid, String, String, DateTime<Utc>)>(
            r#"
            SELECT job_id, status::text, job_type, created_at
            FROM orchestrator.jobs
            WHERE status = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(status.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| OrchestratorError::StoreUnavailable(e.to_string()))?;

        rows.into_iter()
            .map(|(job_id, status, job_type, created_at)| {
                Ok(JobSummary {
                    job_id: JobId(job_id),
                    status: status
                        .parse()
                        .map_err(|e: String| OrchestratorError::Internal(anyhow!(e)))?,
                    job_type,
                    created_at: created_at.timestamp(),
                })
            })
            .collect()
    }
}
