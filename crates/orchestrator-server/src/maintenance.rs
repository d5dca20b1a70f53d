//! Periodic work-queue retention sweep (SPEC_FULL.md §4): spec.md §4.C2
//! mandates 1-day retention on the live lanes and 14-day retention on their
//! DLQ companions. No external scheduler is named in the spec, so this
//! sweep runs as a background task in the façade's own process, modeled on
//! `sem_os_postgres::cleanup::PgCleanupStore`'s maintenance-method shape.

use std::sync::Arc;
use std::time::Duration;

use orchestrator_core::ports::WorkQueue;

const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

pub async fn run(gpu_queue: Arc<dyn WorkQueue>, cpu_queue: Arc<dyn WorkQueue>) {
    loop {
        tokio::time::sleep(SWEEP_INTERVAL).await;
        sweep_once("gpu", gpu_queue.as_ref()).await;
        sweep_once("cpu", cpu_queue.as_ref()).await;
    }
}

async fn sweep_once(lane: &str, queue: &dyn WorkQueue) {
    match queue.purge_expired().await {
        Ok((main, dlq)) => {
            if main > 0 || dlq > 0 {
                tracing::info!("{lane} lane retention sweep: purged {main} main, {dlq} dlq");
            }
        }
        Err(e) => tracing::warn!("{lane} lane retention sweep failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeWorkQueue;

    #[tokio::test]
    async fn sweep_reports_no_error_on_a_healthy_queue() {
        let queue = FakeWorkQueue::default();
        sweep_once("gpu", &queue).await;
    }
}
