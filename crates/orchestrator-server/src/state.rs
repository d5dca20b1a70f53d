//! Shared façade state. Per spec.md §4.C4: "there is no shared mutable
//! state inside the façade except a cached worker-IP value refreshed every
//! 5 minutes (debug-only)".

use std::sync::Arc;

use orchestrator_core::ports::{JobStore, ObjectStoreClient, WorkQueue, WorkerHostController};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobStore>,
    pub gpu_queue: Arc<dyn WorkQueue>,
    pub cpu_queue: Arc<dyn WorkQueue>,
    pub host: Arc<dyn WorkerHostController>,
    pub object_store: Arc<dyn ObjectStoreClient>,
    /// Debug-only cache, refreshed by `ip_refresh::run`. No handler reads
    /// it — it exists purely so the value is observable from `AppState`.
    pub cached_worker_ip: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn queue_for(&self, lane: orchestrator_core::types::Lane) -> &Arc<dyn WorkQueue> {
        match lane {
            orchestrator_core::types::Lane::Gpu => &self.gpu_queue,
            orchestrator_core::types::Lane::Cpu => &self.cpu_queue,
        }
    }
}
