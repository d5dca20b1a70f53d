//! Schema bootstrap via embedded migrations, matching
//! `bpmn-lite-core::store_postgres::PostgresProcessStore::migrate`'s
//! `sqlx::migrate!("./migrations")` pattern. `ensure_schema` is run once at
//! process startup by both binaries (`orchestrator-server`,
//! `orchestrator-adapter`).

use anyhow::Context;
use sqlx::PgPool;

pub async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("failed to run orchestrator-postgres migrations")?;
    Ok(())
}
