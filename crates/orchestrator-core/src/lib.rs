//! Pure domain layer of the GPU task orchestrator: types and port traits
//! only. No sqlx, no reqwest, no axum — see `orchestrator-postgres`,
//! `orchestrator-client`, and `orchestrator-server` for the adapters that
//! implement these ports.

pub mod error;
pub mod host_control;
pub mod idle;
pub mod ports;
pub mod types;

pub use error::{OrchestratorError, Result};
