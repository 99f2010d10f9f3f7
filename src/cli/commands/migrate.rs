use anyhow::Context;
use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::{schema, DatabaseManager};

pub async fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    schema::migrate(&pool).await.context("failed to apply schema")?;
    pool.close().await;

    output_success(
        output_format,
        "Schema is up to date",
        Some(json!({ "tables": ["users", "jokes"] })),
    )
}
