use sqlx::PgPool;
use tracing::info;

use super::DatabaseError;

/// Idempotent DDL for the two relations, applied in order
const SCHEMA: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            api_key TEXT NOT NULL UNIQUE
        )
        "#,
    ),
    (
        "jokes",
        r#"
        CREATE TABLE IF NOT EXISTS jokes (
            id BIGSERIAL PRIMARY KEY,
            intro TEXT NOT NULL,
            punchline TEXT NOT NULL,
            user_id BIGINT NULL REFERENCES users (id)
        )
        "#,
    ),
    (
        "jokes_user_id_idx",
        "CREATE INDEX IF NOT EXISTS jokes_user_id_idx ON jokes (user_id)",
    ),
];

/// Create tables and indexes that do not exist yet
pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;
    for (name, ddl) in SCHEMA {
        sqlx::query(ddl).execute(&mut *tx).await?;
        info!("Ensured schema object: {}", name);
    }
    tx.commit().await?;
    Ok(())
}
