//! HTTP-facing adapters for the orchestrator's two external collaborators:
//! the inference engine (C5's dependency) and the worker-host control plane
//! (C3's dependency). Both implement `orchestrator_core::ports` traits so
//! `orchestrator-server` and `orchestrator-adapter` never depend on
//! `reqwest` directly.

pub mod engine;
pub mod host;
pub mod object;

pub use engine::HttpEngineClient;
pub use host::HttpWorkerHostController;
pub use object::HttpObjectStoreClient;
