//! Connection pool setup and schema migration.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::store::{StoreError, map_sqlx_error};

const SCHEMA: &str = include_str!("../migrations/0001_init.sql");

pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))?;
    info!(max_connections, "connected to postgres");
    Ok(pool)
}

/// Apply the embedded schema. Every statement is idempotent, so this runs on
/// each startup.
pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("migrate", e))?;
    info!("schema migrations applied");
    Ok(())
}
