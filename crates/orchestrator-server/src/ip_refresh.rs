//! Background worker-host IP cache (SPEC_FULL.md §4, spec.md §4.C4: "a
//! cached worker-IP value refreshed every 5 minutes (debug-only)"). Ported
//! from `orchestrator_api.py`'s `refresh_gpu_ip`/`gpu_instance_ip` — never
//! gates request handling (spec.md §9's redesign hint), only read by the
//! `/health` handler... in this design it isn't even surfaced there, it's
//! purely a debug aid future handlers can read from `AppState`.

use std::sync::Arc;
use std::time::Duration;

use orchestrator_core::ports::WorkerHostController;
use tokio::sync::RwLock;

pub async fn run(host: Arc<dyn WorkerHostController>, cache: Arc<RwLock<Option<String>>>, interval: Duration) {
    loop {
        match host.describe_ip().await {
            Ok(ip) => {
                let mut guard = cache.write().await;
                if *guard != ip {
                    tracing::info!("worker host ip updated: {:?} -> {:?}", *guard, ip);
                }
                *guard = ip;
            }
            Err(e) => tracing::warn!("failed to refresh worker host ip: {e}"),
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeWorkerHostController;
    use orchestrator_core::types::HostState;

    #[tokio::test]
    async fn populates_the_cache_from_describe_ip() {
        let host: Arc<dyn WorkerHostController> =
            Arc::new(FakeWorkerHostController::new(HostState::Running));
        let cache = Arc::new(RwLock::new(None));

        // Single iteration body, not the infinite loop.
        let ip = host.describe_ip().await.unwrap();
        *cache.write().await = ip;

        assert_eq!(cache.read().await.as_deref(), Some("10.0.0.1"));
    }
}
