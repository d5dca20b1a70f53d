//! Domain types for the GPU task orchestrator. No I/O, no sqlx, no reqwest —
//! `orchestrator-postgres` and `orchestrator-client` convert these to/from
//! their own wire/row representations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque job identifier (spec.md §3: "128-bit opaque identifier (UUID v4)").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The status state machine of spec.md §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown job status: {other}")),
        }
    }
}

/// One of the two independent lanes (spec.md §4.C2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Gpu,
    Cpu,
}

impl Lane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gpu => "gpu",
            Self::Cpu => "cpu",
        }
    }

    /// Visibility timeout mandated per lane (spec.md §4.C2, §5).
    pub fn default_visibility_sec(&self) -> u64 {
        match self {
            Self::Gpu => 300,
            Self::Cpu => 600,
        }
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Lane {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gpu" => Ok(Self::Gpu),
            "cpu" => Ok(Self::Cpu),
            other => Err(format!("unknown lane: {other}")),
        }
    }
}

/// The job record owned end-to-end by the system (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: JobId,
    pub status: JobStatus,
    pub job_type: String,
    pub request_body: serde_json::Value,
    pub created_at: i64,
    pub updated_at: i64,
    pub worker_job_id: Option<String>,
    pub result_url: Option<String>,
    pub error_message: Option<String>,
}

/// Input to `JobStore::put_if_absent` — the admission-time insert (always PENDING).
#[derive(Debug, Clone)]
pub struct NewJob {
    pub job_id: JobId,
    pub job_type: String,
    pub request_body: serde_json::Value,
    pub created_at: i64,
}

/// Lightweight projection used by `query_by_status` (spec.md §4.C1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: JobId,
    pub status: JobStatus,
    pub job_type: String,
    pub created_at: i64,
}

/// The wire shape of a queue message (spec.md §3, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueMessage {
    pub job_id: JobId,
    pub job_type: String,
    pub request_body: serde_json::Value,
}

/// Opaque handle authorizing `delete`/`extend` on a received message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptToken(pub String);

impl std::fmt::Display for ReceiptToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returned by `WorkQueue::long_receive`.
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub message: QueueMessage,
    pub receipt_token: ReceiptToken,
    /// Number of times this message has been received (1 on first receive).
    /// Used to enforce `max_receive_count = 3` before DLQ promotion.
    pub receive_count: i32,
}

/// State of the managed GPU worker host (spec.md §4.C3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostState {
    Stopped,
    Pending,
    Running,
    Stopping,
    Other,
}

/// Engine's synchronous acknowledgement to a submit call (spec.md §6).
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSubmission {
    pub engine_job_id: String,
}

/// Engine's reported status on a poll (spec.md §6).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnginePollResult {
    pub status: EngineStatus,
    #[serde(default)]
    pub result_s3_uri: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn job_status_round_trips_through_str() {
        for s in [
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(JobStatus::from_str(s.as_str()).unwrap(), s);
        }
    }

    #[test]
    fn job_status_rejects_unknown_string() {
        assert!(JobStatus::from_str("retired").is_err());
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn lane_visibility_timeouts_match_spec() {
        assert_eq!(Lane::Gpu.default_visibility_sec(), 300);
        assert_eq!(Lane::Cpu.default_visibility_sec(), 600);
    }

    #[test]
    fn lane_round_trips_through_str() {
        assert_eq!(Lane::from_str("gpu").unwrap(), Lane::Gpu);
        assert_eq!(Lane::from_str("cpu").unwrap(), Lane::Cpu);
        assert!(Lane::from_str("tpu").is_err());
    }

    #[test]
    fn job_id_parses_its_own_display_output() {
        let id = JobId::new();
        let parsed: JobId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
