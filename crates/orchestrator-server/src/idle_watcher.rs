//! C3's idle-watcher (spec.md §4.C3, §8 P6): samples the GPU lane's
//! approximate visible-message count on a fixed 5-minute grid and stops the
//! worker host once it has been empty for six consecutive samples (30
//! minutes). Mirrors `lambda_shutdown.py`'s state-check-then-stop shape,
//! minus the CloudWatch-alarm plumbing — here the alarm condition is
//! evaluated in-process by `orchestrator_core::idle::IdleWindow`.

use std::sync::Arc;
use std::time::Duration;

use orchestrator_core::idle::IdleWindow;
use orchestrator_core::ports::{WorkQueue, WorkerHostController};
use orchestrator_core::types::HostState;

pub struct IdleWatcher {
    gpu_queue: Arc<dyn WorkQueue>,
    host: Arc<dyn WorkerHostController>,
    interval: Duration,
    window: IdleWindow,
}

impl IdleWatcher {
    pub fn new(
        gpu_queue: Arc<dyn WorkQueue>,
        host: Arc<dyn WorkerHostController>,
        interval: Duration,
        consecutive_samples: u32,
    ) -> Self {
        Self {
            gpu_queue,
            host,
            interval,
            window: IdleWindow::new(consecutive_samples),
        }
    }

    /// Runs the sample-evaluate-act loop forever. Spawn as a background
    /// task via `tokio::spawn`.
    pub async fn run(mut self) {
        loop {
            tokio::time::sleep(self.interval).await;
            self.tick().await;
        }
    }

    /// One sample-and-maybe-act step, split out from `run` so it can be
    /// driven synchronously in tests without waiting on real sleeps.
    async fn tick(&mut self) {
        let visible = match self.gpu_queue.approx_visible_count().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("idle-watcher: failed to sample gpu lane depth: {e}");
                return;
            }
        };

        if self.window.push(visible) {
            self.maybe_shutdown().await;
            self.window.reset();
        }
    }

    /// spec.md §4.C3 steps 1-4: read state, proceed only if running, stop,
    /// record the action.
    async fn maybe_shutdown(&self) {
        match self.host.describe_state().await {
            Ok(HostState::Running) => match self.host.stop().await {
                Ok(()) => tracing::info!(
                    "idle-watcher: stopped worker host after 30 minutes with an empty GPU lane"
                ),
                Err(e) => tracing::warn!("idle-watcher: stop failed: {e}"),
            },
            Ok(other) => {
                tracing::debug!("idle-watcher: alarm fired but host is {other:?}, no-op");
            }
            Err(e) => tracing::warn!("idle-watcher: describe_state failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeWorkQueue, FakeWorkerHostController};

    fn watcher(gpu_queue: Arc<FakeWorkQueue>, host: Arc<FakeWorkerHostController>) -> IdleWatcher {
        IdleWatcher::new(gpu_queue, host, Duration::from_secs(300), 6)
    }

    #[tokio::test]
    async fn stops_the_host_after_six_consecutive_empty_samples() {
        let gpu_queue = Arc::new(FakeWorkQueue::default());
        let host = Arc::new(FakeWorkerHostController::new(HostState::Running));
        let mut w = watcher(gpu_queue, host.clone());

        for _ in 0..5 {
            w.tick().await;
            assert_eq!(host.stop_calls(), 0);
        }
        w.tick().await;
        assert_eq!(host.stop_calls(), 1);
    }

    #[tokio::test]
    async fn does_not_stop_an_already_stopped_host() {
        let gpu_queue = Arc::new(FakeWorkQueue::default());
        let host = Arc::new(FakeWorkerHostController::new(HostState::Stopped));
        let mut w = watcher(gpu_queue, host.clone());

        for _ in 0..6 {
            w.tick().await;
        }
        assert_eq!(host.stop_calls(), 0);
    }

    #[tokio::test]
    async fn a_message_arriving_mid_window_resets_the_count() {
        let gpu_queue = Arc::new(FakeWorkQueue::default());
        let host = Arc::new(FakeWorkerHostController::new(HostState::Running));
        let mut w = watcher(gpu_queue.clone(), host.clone());

        for _ in 0..5 {
            w.tick().await;
        }
        gpu_queue
            .enqueue(orchestrator_core::types::QueueMessage {
                job_id: orchestrator_core::types::JobId::new(),
                job_type: "camera-angle".into(),
                request_body: serde_json::json!({}),
            })
            .await
            .unwrap();
        w.tick().await;
        assert_eq!(host.stop_calls(), 0);

        // Drain it back out so the lane reads empty again.
        gpu_queue
            .long_receive(Duration::from_millis(1), Duration::from_secs(1))
            .await
            .unwrap();
        for _ in 0..6 {
            w.tick().await;
        }
        assert_eq!(host.stop_calls(), 1);
    }

    #[tokio::test]
    async fn exactly_one_stop_is_issued_per_idle_window() {
        let gpu_queue = Arc::new(FakeWorkQueue::default());
        let host = Arc::new(FakeWorkerHostController::new(HostState::Running));
        let mut w = watcher(gpu_queue, host.clone());

        for _ in 0..6 {
            w.tick().await;
        }
        // Host is now stopped; further idle ticks must not call stop again.
        for _ in 0..6 {
            w.tick().await;
        }
        assert_eq!(host.stop_calls(), 1);
    }
}
