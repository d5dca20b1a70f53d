//! Adapter configuration (SPEC_FULL.md §2, §6): env vars plus a `--lane`
//! flag, since one adapter binary instance serves exactly one lane
//! (spec.md §4.C5: "one long-lived adapter process per lane").

use clap::{Parser, ValueEnum};
use orchestrator_core::types::Lane;

/// CLI-facing mirror of `orchestrator_core::types::Lane`. `Lane` itself stays
/// free of a `clap` dependency (orchestrator-core is the pure domain crate),
/// so the value-enum derive lives on this local copy instead, same as
/// `dsl_cli`'s `OutputFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LaneArg {
    Gpu,
    Cpu,
}

impl From<LaneArg> for Lane {
    fn from(arg: LaneArg) -> Self {
        match arg {
            LaneArg::Gpu => Lane::Gpu,
            LaneArg::Cpu => Lane::Cpu,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "orchestrator-adapter")]
#[command(about = "Bridges a work-queue lane to the local inference engine")]
pub struct Cli {
    /// Which lane this process drains: gpu or cpu.
    #[arg(long, env = "ORC_LANE", value_enum)]
    pub lane: LaneArg,
}

#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub database_url: String,
    pub engine_base_url: String,
    pub lane: Lane,
    pub poll_interval_sec: u64,
}

impl AdapterConfig {
    pub fn from_env(lane: Lane) -> Self {
        let database_url =
            std::env::var("ORC_DATABASE_URL").expect("ORC_DATABASE_URL must be set");
        let engine_base_url = std::env::var("ORC_ENGINE_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".into());
        let poll_interval_sec: u64 = std::env::var("ORC_POLL_INTERVAL_SEC")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        Self {
            database_url,
            engine_base_url,
            lane,
            poll_interval_sec,
        }
    }
}
