//! Database adapters (connection pool, schema bootstrap).

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::user_store::StoreError;
use crate::user_store::postgres::map_sqlx_error;

/// Schema owned by this service. Idempotent.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id   BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL CHECK (name <> ''),
    dob  DATE NOT NULL
)
"#;

/// Open a pool and verify the database answers.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| map_sqlx_error("ping", e))?;

    tracing::info!(max_connections, "database pool ready");
    Ok(pool)
}

/// Create the `users` table when missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    Ok(())
}
