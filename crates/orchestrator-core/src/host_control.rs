//! C3's cold-start decision (spec.md §4.C3): "Read current host state ... If
//! stopped -> issue start; if pending or running -> no-op; otherwise -> log
//! and no-op." Pure orchestration over the `WorkerHostController` port, so
//! it is testable against a fake without any HTTP client.

use crate::error::Result;
use crate::ports::WorkerHostController;
use crate::types::HostState;

/// Invoked by the façade on every admission (spec.md §4.C4 step 4). Never
/// blocks the caller on the host actually finishing boot — only on the
/// describe + (possibly) start round trip, which the façade bounds with a
/// short client timeout (spec.md §5: "5 s on describe").
pub async fn cold_start(host: &dyn WorkerHostController) -> Result<()> {
    match host.describe_state().await? {
        HostState::Stopped => host.start().await,
        HostState::Pending | HostState::Running => Ok(()),
        HostState::Stopping | HostState::Other => {
            tracing::warn!("cold-start: host in non-actionable state, no-op");
            Ok(())
        }
    }
}
