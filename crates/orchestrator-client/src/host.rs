//! HTTP client for the worker-host control plane (C3, spec.md §4.C3).
//!
//! spec.md deliberately keeps cloud-infrastructure declarations out of
//! scope (§1: "Cloud-infrastructure declarations ... The spec states only
//! the *semantic* resources the core requires"). This client talks to a
//! generic control-plane HTTP facade over the single managed worker host —
//! `describe`/`start`/`stop` — rather than embedding a specific cloud SDK,
//! so the orchestrator core never depends on a vendor crate for its one
//! external collaborator.

use async_trait::async_trait;
use orchestrator_core::error::{OrchestratorError, Result};
use orchestrator_core::ports::WorkerHostController;
use orchestrator_core::types::HostState;
use serde::Deserialize;

pub struct HttpWorkerHostController {
    base_url: String,
    host_id: String,
    client: reqwest::Client,
}

impl HttpWorkerHostController {
    pub fn new(base_url: impl Into<String>, host_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            host_id: host_id.into(),
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(5))
                .build()
                .expect("failed to build reqwest client"),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!(
            "{}/hosts/{}{}",
            self.base_url.trim_end_matches('/'),
            self.host_id,
            suffix
        )
    }
}

#[derive(Deserialize)]
struct DescribeResponse {
    state: String,
    #[serde(default)]
    ip: Option<String>,
}

fn parse_state(s: &str) -> HostState {
    match s {
        "stopped" => HostState::Stopped,
        "pending" => HostState::Pending,
        "running" => HostState::Running,
        "stopping" => HostState::Stopping,
        _ => HostState::Other,
    }
}

#[async_trait]
impl WorkerHostController for HttpWorkerHostController {
    async fn describe_state(&self) -> Result<HostState> {
        let resp = self
            .client
            .get(self.url(""))
            .send()
            .await
            .map_err(|e| OrchestratorError::WorkerStartFailure(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(OrchestratorError::WorkerStartFailure(format!(
                "describe failed: HTTP {}",
                resp.status()
            )));
        }

        let body: DescribeResponse = resp
            .json()
            .await
            .map_err(|e| OrchestratorError::WorkerStartFailure(e.to_string()))?;
        Ok(parse_state(&body.state))
    }

    async fn start(&self) -> Result<()> {
        let resp = self
            .client
            .post(self.url("/start"))
            .send()
            .await
            .map_err(|e| OrchestratorError::WorkerStartFailure(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(OrchestratorError::WorkerStartFailure(format!(
                "start failed: HTTP {}",
                resp.status()
            )));
        }
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        let resp = self
            .client
            .post(self.url("/stop"))
            .send()
            .await
            .map_err(|e| OrchestratorError::WorkerStartFailure(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(OrchestratorError::WorkerStartFailure(format!(
                "stop failed: HTTP {}",
                resp.status()
            )));
        }
        Ok(())
    }

    async fn describe_ip(&self) -> Result<Option<String>> {
        let resp = self
            .client
            .get(self.url(""))
            .send()
            .await
            .map_err(|e| OrchestratorError::WorkerStartFailure(e.to_string()))?;

        if !resp.status().is_success() {
            return Ok(None);
        }

        let body: DescribeResponse = resp
            .json()
            .await
            .map_err(|e| OrchestratorError::WorkerStartFailure(e.to_string()))?;
        Ok(body.ip)
    }
}
