//! Thin HTTP pass-through to the external artifact object store backing
//! `GET /api/v1/jobs/{id}`'s `result_url` and `DELETE /api/v1/images/{key}`
//! (spec.md §6). The store itself is out of scope (spec.md §1); this is
//! just the one operation the façade exposes against it.

use async_trait::async_trait;
use orchestrator_core::error::{OrchestratorError, Result};
use orchestrator_core::ports::ObjectStoreClient;

pub struct HttpObjectStoreClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpObjectStoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ObjectStoreClient for HttpObjectStoreClient {
    async fn delete(&self, object_key: &str) -> Result<()> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), object_key);
        let resp = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| OrchestratorError::Internal(anyhow::anyhow!(e)))?;

        if !resp.status().is_success() && resp.status().as_u16() != 404 {
            return Err(OrchestratorError::Internal(anyhow::anyhow!(
                "object delete failed: HTTP {}",
                resp.status()
            )));
        }
        Ok(())
    }
}
