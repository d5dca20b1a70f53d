//! Static route → lane mapping (spec.md §4.C4: "Route → lane mapping is
//! static configuration ... The façade knows the mapping; the adapters do
//! not need to.") and the closed set of admission routes (spec.md §6).

use orchestrator_core::types::Lane;

/// Routes that submit to the CPU lane (spec.md §6: "the two CPU-lane routes
/// are `/api/v1/face-mask/tasks` and `/api/v1/full-face-swap/tasks`").
const CPU_ROUTES: &[&str] = &["face-mask", "full-face-swap"];

/// The remaining routes in the closed set submit to the GPU lane, matching
/// the inference routes named across spec.md's scenarios (S1, S2) and the
/// original engine's model services (`qwen_multi_angle`, `qwen_edit_api`,
/// `watermark_service`) — see SPEC_FULL.md §4.
const GPU_ROUTES: &[&str] = &["camera-angle", "qwen-image-edit", "watermark-removal", "face-swap"];

/// Resolve a `<route>` path segment to its lane, or `None` if it is not in
/// the closed set (spec.md §6: "Routes are a closed set").
pub fn lane_for_route(route: &str) -> Option<Lane> {
    if CPU_ROUTES.contains(&route) {
        Some(Lane::Cpu)
    } else if GPU_ROUTES.contains(&route) {
        Some(Lane::Gpu)
    } else {
        None
    }
}

/// Exposed for the root info endpoint (spec.md §4.C4 `health()`'s sibling,
/// `cpu_orchestrator_api.py`'s `GET /`).
pub fn gpu_routes() -> &'static [&'static str] {
    GPU_ROUTES
}

pub fn cpu_routes() -> &'static [&'static str] {
    CPU_ROUTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_routes_map_to_cpu_lane() {
        assert_eq!(lane_for_route("face-mask"), Some(Lane::Cpu));
        assert_eq!(lane_for_route("full-face-swap"), Some(Lane::Cpu));
    }

    #[test]
    fn gpu_routes_map_to_gpu_lane() {
        assert_eq!(lane_for_route("camera-angle"), Some(Lane::Gpu));
        assert_eq!(lane_for_route("qwen-image-edit"), Some(Lane::Gpu));
    }

    #[test]
    fn unknown_route_is_rejected() {
        assert_eq!(lane_for_route("not-a-route"), None);
    }
}
