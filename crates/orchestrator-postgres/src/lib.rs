//! PostgreSQL implementations of `orchestrator_core::ports` — the Job Store
//! (C1) and the two Work Queue lanes (C2). Mirrors `sem_os_postgres`'s
//! layout: one newtype per port, a convenience aggregate to build them all
//! from a single pool.

pub mod job_store;
pub mod schema;
pub mod work_queue;

pub use job_store::PgJobStore;
pub use work_queue::PgWorkQueue;

use orchestrator_core::types::Lane;
use sqlx::PgPool;

/// Convenience struct that constructs all Postgres adapters from a single pool.
pub struct PgStores {
    pub jobs: PgJobStore,
    pub gpu_queue: PgWorkQueue,
    pub cpu_queue: PgWorkQueue,
}

impl PgStores {
    pub fn new(pool: PgPool) -> Self {
        Self {
            jobs: PgJobStore::new(pool.clone()),
            gpu_queue: PgWorkQueue::new(pool.clone(), Lane::Gpu),
            cpu_queue: PgWorkQueue::new(pool, Lane::Cpu),
        }
    }
}
