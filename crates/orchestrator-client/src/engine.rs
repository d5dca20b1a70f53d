//! HTTP client for the local inference engine (spec.md §6 "Engine HTTP
//! contract"). Co-resident with `orchestrator-adapter` on the worker host —
//! modeled on `sem_os_client::http::HttpClient`'s per-call
//! `reqwest::Client` + JSON (de)serialization style, without the JWT bearer
//! (the engine is a loopback service, not a multi-tenant API).

use async_trait::async_trait;
use orchestrator_core::error::{OrchestratorError, Result};
use orchestrator_core::ports::InferenceEngineClient;
use orchestrator_core::types::{EnginePollResult, EngineSubmission};

pub struct HttpEngineClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpEngineClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("failed to build reqwest client"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl InferenceEngineClient for HttpEngineClient {
    async fn submit(
        &self,
        job_type: &str,
        request_body: &serde_json::Value,
    ) -> Result<EngineSubmission> {
        let path = if job_type.starts_with('/') {
            job_type.to_string()
        } else {
            format!("/{job_type}")
        };

        let resp = self
            .client
            .post(self.url(&path))
            .timeout(std::time::Duration::from_secs(30))
            .json(request_body)
            .send()
            .await
            .map_err(|e| OrchestratorError::Internal(anyhow::anyhow!(e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(OrchestratorError::Internal(anyhow::anyhow!(
                "engine submit failed: HTTP {status}: {body}"
            )));
        }

        #[derive(serde::Deserialize)]
        struct RawSubmitResponse {
            job_id: String,
        }
        let raw: RawSubmitResponse = resp
            .json()
            .await
            .map_err(|e| OrchestratorError::Internal(anyhow::anyhow!(e)))?;

        Ok(EngineSubmission {
            engine_job_id: raw.job_id,
        })
    }

    async fn poll(&self, engine_job_id: &str) -> Result<EnginePollResult> {
        let resp = self
            .client
            .get(self.url(&format!("/api/v1/jobs/{engine_job_id}")))
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| OrchestratorError::Internal(anyhow::anyhow!(e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(OrchestratorError::Internal(anyhow::anyhow!(
                "engine poll failed: HTTP {status}: {body}"
            )));
        }

        resp.json::<EnginePollResult>()
            .await
            .map_err(|e| OrchestratorError::Internal(anyhow::anyhow!(e)))
    }
}
